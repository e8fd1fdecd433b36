fn main() -> std::process::ExitCode {
    finderclip_lib::run()
}
