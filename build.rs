fn main() {
    // Baked into CloudConfig / SystemConfig via option_env!
    for var in [
        "WIFI_SSID",
        "WIFI_PASS",
        "RTDB_URL",
        "RTDB_AUTH",
        "WATERHARVEST_CONFIG_JSON",
    ] {
        println!("cargo:rerun-if-env-changed={var}");
    }

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
