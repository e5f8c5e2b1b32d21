use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = fedsearch_api::Args::parse();

	fedsearch_api::run(args).await
}
