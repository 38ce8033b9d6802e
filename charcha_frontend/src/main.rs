fn main() -> Result<(), eframe::Error> {
    charcha_frontend::run_frontend()
}
