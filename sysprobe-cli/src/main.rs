fn main() -> anyhow::Result<()> {
    sysprobe_cli::run()
}
