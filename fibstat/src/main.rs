fn main() -> anyhow::Result<()> {
    fibstat::run()
}
