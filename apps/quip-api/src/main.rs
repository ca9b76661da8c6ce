use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = quip_api::Args::parse();

	quip_api::run(args).await
}
