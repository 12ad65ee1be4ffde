fn main() -> anyhow::Result<()> {
    daggerscribe::cli::run_cli()
}
