fn main() {
    stepwatch_lib::run()
}
