fn main() {
    compare_ast::cli::run();
}
