fn main() -> anyhow::Result<()> {
    filter_lab::flow::run()
}
