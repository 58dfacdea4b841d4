use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = paperscout_daily::Args::parse();

	paperscout_daily::run(args).await
}
