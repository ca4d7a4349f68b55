fn main() {
    game_reviews_lib::run()
}
