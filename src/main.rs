fn main() -> anyhow::Result<()> {
    toy_train::run(toy_train::Settings::default())
}
