use std::sync::Arc;

use time::{Duration, OffsetDateTime};

use quip_config::Postgres;
use quip_domain::{
	CaptionFilter, LengthBuckets, LengthType, Page, PlatformMatch, SortMode, StatAction,
};
use quip_storage::{
	Error, captions,
	db::Db,
	history,
	models::{NewCaption, NewHistoryEntry, NewTaxonomyEntry},
	taxonomy,
};
use quip_testkit::TestDatabase;

async fn setup() -> Option<(TestDatabase, Db)> {
	let Some(base_dsn) = quip_testkit::env_dsn() else {
		eprintln!("Skipping caption storage tests; set QUIP_PG_DSN to run this test.");

		return None;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 8 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	Some((test_db, db))
}

async fn teardown(test_db: TestDatabase, db: Db) {
	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

fn caption(content: &str, platform: &str) -> NewCaption {
	NewCaption {
		content: content.to_string(),
		formatted_content: None,
		platform: platform.to_string(),
		category_id: None,
		mood_id: None,
		created_at: None,
	}
}

async fn insert_sized(db: &Db, chars: usize, mood_id: Option<&String>) -> String {
	let mut new = caption(&"x".repeat(chars), "instagram");

	new.mood_id = mood_id.cloned();

	captions::insert(&db.pool, &new).await.expect("Failed to insert caption.").id
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set QUIP_PG_DSN to run."]
async fn insert_derives_character_count() {
	let Some((test_db, db)) = setup().await else { return };
	let row = captions::insert(&db.pool, &caption("café ☕", "instagram"))
		.await
		.expect("Failed to insert caption.");

	assert_eq!(row.character_count, 6);
	assert_eq!(row.copy_count, 0);
	assert_eq!(row.view_count, 0);
	assert!(row.is_active);

	teardown(test_db, db).await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set QUIP_PG_DSN to run."]
async fn concurrent_copy_increments_are_not_lost() {
	let Some((test_db, db)) = setup().await else { return };
	let row = captions::insert(&db.pool, &caption("Counting every copy", "tiktok"))
		.await
		.expect("Failed to insert caption.");

	for _ in 0..3 {
		captions::increment(&db.pool, &row.id, StatAction::Copy)
			.await
			.expect("Failed to increment.");
	}

	let pool = Arc::new(db.pool.clone());
	let id = Arc::new(row.id.clone());
	let mut handles = Vec::new();

	for _ in 0..40 {
		let pool = pool.clone();
		let id = id.clone();

		handles.push(tokio::spawn(async move {
			captions::increment(&pool, &id, StatAction::Copy).await
		}));
	}
	for handle in handles {
		let value = handle.await.expect("Increment task panicked.").expect("Increment failed.");

		assert!(value.is_some());
	}

	let reloaded = captions::get_by_id(&db.pool, &row.id)
		.await
		.expect("Failed to reload caption.")
		.expect("Caption disappeared.");

	assert_eq!(reloaded.copy_count, 43);
	assert_eq!(reloaded.view_count, 0);

	teardown(test_db, db).await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set QUIP_PG_DSN to run."]
async fn increment_on_missing_id_changes_nothing() {
	let Some((test_db, db)) = setup().await else { return };
	let row = captions::insert(&db.pool, &caption("Untouched", "instagram"))
		.await
		.expect("Failed to insert caption.");
	let result = captions::increment(&db.pool, "missing-id", StatAction::Copy)
		.await
		.expect("Increment query failed.");

	assert_eq!(result, None);

	let reloaded = captions::get_by_id(&db.pool, &row.id)
		.await
		.expect("Failed to reload caption.")
		.expect("Caption disappeared.");

	assert_eq!(reloaded.copy_count, 0);

	teardown(test_db, db).await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set QUIP_PG_DSN to run."]
async fn inactive_captions_are_hidden_from_pages_but_not_direct_lookup() {
	let Some((test_db, db)) = setup().await else { return };
	let visible = captions::insert(&db.pool, &caption("Sunny day", "instagram"))
		.await
		.expect("Failed to insert caption.");
	let hidden = captions::insert(&db.pool, &caption("Sunny night", "instagram"))
		.await
		.expect("Failed to insert caption.");

	captions::set_active(&db.pool, &hidden.id, false).await.expect("Failed to deactivate.");

	let filter = CaptionFilter { term: Some("sunny".to_string()), ..Default::default() };
	let buckets = LengthBuckets::default();
	let page = captions::fetch_page(&db.pool, &filter, buckets).await.expect("Failed to list.");
	let total = captions::count(&db.pool, &filter, buckets).await.expect("Failed to count.");

	assert_eq!(page.iter().map(|row| row.id.as_str()).collect::<Vec<_>>(), vec![visible.id.as_str()]);
	assert_eq!(total, 1);

	let direct = captions::get_by_id(&db.pool, &hidden.id).await.expect("Failed to fetch.");

	assert!(direct.is_some_and(|row| !row.is_active));

	teardown(test_db, db).await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set QUIP_PG_DSN to run."]
async fn category_filter_accepts_id_or_slug_and_newest_orders_by_creation() {
	let Some((test_db, db)) = setup().await else { return };
	let travel = taxonomy::insert_category(
		&db.pool,
		&NewTaxonomyEntry {
			name: "travel".to_string(),
			display_name: "Travel".to_string(),
			slug: "travel".to_string(),
			icon: None,
		},
	)
	.await
	.expect("Failed to insert category.");
	let now = OffsetDateTime::now_utc();
	let mut ids = Vec::new();

	for (index, content) in ["Old trip", "Mid trip", "New trip"].into_iter().enumerate() {
		let mut new = caption(content, "instagram");

		new.category_id = Some(travel.id.clone());
		new.created_at = Some(now - Duration::hours(10 - index as i64));

		ids.push(captions::insert(&db.pool, &new).await.expect("Failed to insert caption.").id);
	}

	captions::insert(&db.pool, &caption("Uncategorized", "instagram"))
		.await
		.expect("Failed to insert caption.");

	for category in [travel.id.clone(), "travel".to_string()] {
		let filter = CaptionFilter {
			category: Some(category),
			sort: SortMode::Newest,
			page: Page { limit: 10, offset: 0 },
			..Default::default()
		};
		let page = captions::fetch_page(&db.pool, &filter, LengthBuckets::default())
			.await
			.expect("Failed to list.");

		assert_eq!(
			page.iter().map(|row| row.id.clone()).collect::<Vec<_>>(),
			ids.iter().rev().cloned().collect::<Vec<_>>()
		);
	}

	teardown(test_db, db).await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set QUIP_PG_DSN to run."]
async fn mood_set_filter_orders_by_length_with_id_tie_break() {
	let Some((test_db, db)) = setup().await else { return };
	let mut mood_ids = Vec::new();

	for slug in ["happy", "calm", "moody"] {
		let mood = taxonomy::insert_mood(
			&db.pool,
			&NewTaxonomyEntry {
				name: slug.to_string(),
				display_name: slug.to_string(),
				slug: slug.to_string(),
				icon: None,
			},
		)
		.await
		.expect("Failed to insert mood.");

		mood_ids.push(mood.id);
	}

	let short = insert_sized(&db, 10, Some(&mood_ids[0])).await;
	let long_a = insert_sized(&db, 30, Some(&mood_ids[1])).await;
	let long_b = insert_sized(&db, 30, Some(&mood_ids[0])).await;

	insert_sized(&db, 20, Some(&mood_ids[2])).await;
	insert_sized(&db, 40, None).await;

	let mut tied = vec![long_a, long_b];

	tied.sort();

	let buckets = LengthBuckets::default();
	let selected = vec![mood_ids[0].clone(), mood_ids[1].clone()];

	for (sort, expected) in [
		(SortMode::Longest, vec![tied[0].clone(), tied[1].clone(), short.clone()]),
		(SortMode::Shortest, vec![short.clone(), tied[0].clone(), tied[1].clone()]),
	] {
		let filter = CaptionFilter {
			mood_ids: selected.clone(),
			sort,
			page: Page { limit: 10, offset: 0 },
			..Default::default()
		};
		let page = captions::fetch_page(&db.pool, &filter, buckets).await.expect("Failed to list.");
		let total = captions::count(&db.pool, &filter, buckets).await.expect("Failed to count.");

		assert_eq!(page.into_iter().map(|row| row.id).collect::<Vec<_>>(), expected, "{sort:?}");
		assert_eq!(total, 3);
	}

	teardown(test_db, db).await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set QUIP_PG_DSN to run."]
async fn length_type_filter_respects_bucket_edges() {
	let Some((test_db, db)) = setup().await else { return };
	let buckets = LengthBuckets { short_max: 10, medium_max: 20 };

	for chars in [1, 10, 11, 20, 21] {
		captions::insert(&db.pool, &caption(&"y".repeat(chars), "tiktok"))
			.await
			.expect("Failed to insert caption.");
	}

	for (length, expected) in [
		(LengthType::Short, vec![1, 10]),
		(LengthType::Medium, vec![11, 20]),
		(LengthType::Long, vec![21]),
	] {
		let filter = CaptionFilter {
			length: Some(length),
			sort: SortMode::Shortest,
			page: Page { limit: 10, offset: 0 },
			..Default::default()
		};
		let page = captions::fetch_page(&db.pool, &filter, buckets).await.expect("Failed to list.");
		let total = captions::count(&db.pool, &filter, buckets).await.expect("Failed to count.");

		assert_eq!(
			page.iter().map(|row| row.character_count).collect::<Vec<_>>(),
			expected,
			"{length:?}"
		);
		assert_eq!(total, expected.len() as i64);
	}

	teardown(test_db, db).await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set QUIP_PG_DSN to run."]
async fn unknown_raw_platform_matches_nothing() {
	let Some((test_db, db)) = setup().await else { return };

	captions::insert(&db.pool, &caption("Hello", "instagram")).await.expect("Failed to insert.");

	let filter = CaptionFilter {
		platform: Some(PlatformMatch::Raw("myspace".to_string())),
		..Default::default()
	};
	let total = captions::count(&db.pool, &filter, LengthBuckets::default())
		.await
		.expect("Failed to count.");

	assert_eq!(total, 0);

	teardown(test_db, db).await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set QUIP_PG_DSN to run."]
async fn taxonomy_search_matches_either_name_and_slugs_are_unique() {
	let Some((test_db, db)) = setup().await else { return };
	let entry = |name: &str, display_name: &str, slug: &str| NewTaxonomyEntry {
		name: name.to_string(),
		display_name: display_name.to_string(),
		slug: slug.to_string(),
		icon: None,
	};

	taxonomy::insert_mood(&db.pool, &entry("joyful", "Happy", "happy"))
		.await
		.expect("Failed to insert mood.");
	taxonomy::insert_mood(&db.pool, &entry("happy_go_lucky", "Carefree", "carefree"))
		.await
		.expect("Failed to insert mood.");
	taxonomy::insert_mood(&db.pool, &entry("calm", "Calm", "calm"))
		.await
		.expect("Failed to insert mood.");

	let moods = taxonomy::search_moods(&db.pool, "HAPPY", 10).await.expect("Failed to search.");

	assert_eq!(
		moods.iter().map(|mood| mood.display_name.as_str()).collect::<Vec<_>>(),
		vec!["Carefree", "Happy"]
	);

	let duplicate = taxonomy::insert_mood(&db.pool, &entry("other", "Other", "calm")).await;

	assert!(matches!(duplicate, Err(Error::Conflict(_))), "Unexpected result: {duplicate:?}");

	// Slugs are unique per collection only.
	taxonomy::insert_category(&db.pool, &entry("calm", "Calm", "calm"))
		.await
		.expect("Category slug should not collide with mood slug.");

	teardown(test_db, db).await;
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set QUIP_PG_DSN to run."]
async fn history_is_scoped_by_session() {
	let Some((test_db, db)) = setup().await else { return };
	let entry = |session: &str, input: &str| NewHistoryEntry {
		session_id: session.to_string(),
		kind: "rewrite".to_string(),
		input: input.to_string(),
		output: format!("{input}!"),
		platform: None,
		tone: None,
	};
	let first = history::insert(&db.pool, &entry("s1", "one")).await.expect("Failed to insert.");

	history::insert(&db.pool, &entry("s1", "two")).await.expect("Failed to insert.");
	history::insert(&db.pool, &entry("s2", "three")).await.expect("Failed to insert.");

	let listed = history::list_by_session(&db.pool, "s1", 10).await.expect("Failed to list.");

	assert_eq!(listed.len(), 2);
	assert!(history::get(&db.pool, "s2", &first.id).await.expect("Failed to get.").is_none());
	assert!(!history::delete(&db.pool, "s2", &first.id).await.expect("Failed to delete."));
	assert!(history::delete(&db.pool, "s1", &first.id).await.expect("Failed to delete."));
	assert_eq!(history::clear_session(&db.pool, "s1").await.expect("Failed to clear."), 1);
	assert_eq!(history::list_by_session(&db.pool, "s2", 10).await.expect("Failed to list.").len(), 1);

	teardown(test_db, db).await;
}
