//! Play the first node of a script, printing each line.
//!
//! `cargo run -p weaver_runner --example sample -- path/to/script.yarn.txt`

use std::path::Path;

use weaver_runner::{DialogueRunner, Status};

#[tokio::main]
async fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "samples/tutorial.yarn.txt".to_string());
    let text = std::fs::read_to_string(Path::new(&path)).unwrap();
    let script = weaver_script::compile(&path, &text).unwrap();
    let first = script.node_names().next().unwrap().to_string();

    let mut runner = DialogueRunner::new();
    runner.add_script(script);
    runner.set_start_node(first);
    runner.start().unwrap();

    let mut status = runner.subscribe();
    loop {
        match status.borrow_and_update().clone() {
            Status::Running { node, line } => {
                println!("{node}: {}", line.unwrap_or_default());
                runner.advance();
            }
            Status::Stopped => break,
        }
        if status.changed().await.is_err() {
            break;
        }
    }
}
