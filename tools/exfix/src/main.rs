fn main() {
    std::process::exit(exfix::exit_code(&exfix::run()));
}
