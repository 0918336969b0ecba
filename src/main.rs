fn main() {
    subgame_solver::cli::run();
}
