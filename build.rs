fn main() {
    // Secrets are baked in with `option_env!` (see `config::Secrets`);
    // rebuild when any of them changes.
    for key in [
        "WIFI_SSID",
        "WIFI_PASS",
        "BOT_TOKEN",
        "CHAT_ID",
        "BLYNK_TOKEN",
        "SHEETS_URL",
    ] {
        println!("cargo:rerun-if-env-changed={key}");
    }

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
