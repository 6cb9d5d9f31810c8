fn main() {
    dawn_watch::game::run();
}
