fn main() {
    // ESP-IDF environment is only needed for the on-target build; host
    // tests run with `--no-default-features` and skip it.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
