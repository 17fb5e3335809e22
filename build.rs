fn main() {
    // No-op on host builds; exports the ESP-IDF link environment when the
    // espidf toolchain is active.
    embuild::espidf::sysenv::output();
}
