fn main() -> Result<(), Box<dyn std::error::Error>> {
    edubots::cli::main()
}
