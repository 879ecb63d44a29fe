fn main() {
    // option_env!() values are cached between builds otherwise.
    println!("cargo:rerun-if-env-changed=ECHO_API_URL");
}
