// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_prompt_library(size: usize) -> String {
    let base = "## Section\n\nSome **notes** about `these` prompts.\n\n- Summarize the text below.\n- Rewrite this paragraph\n  in a friendlier tone\n  and keep it short\n\n";
    base.repeat(size)
}
