use crate::collab::{BoxError, DialogueRuntime};
use async_trait::async_trait;
use weaver_runner::DialogueRunner;

#[async_trait]
impl DialogueRuntime for DialogueRunner {
    fn is_running(&self) -> bool {
        DialogueRunner::is_running(self)
    }

    fn request_stop(&mut self) {
        self.stop();
    }

    async fn wait_stopped(&self) {
        DialogueRunner::wait_stopped(self).await;
    }

    fn clear(&mut self) {
        DialogueRunner::clear(self);
    }

    fn compile(&mut self, name: &str, text: &str) -> Result<(), Vec<String>> {
        match weaver_script::compile(name, text) {
            Ok(script) => {
                self.add_script(script);
                Ok(())
            }
            Err(errors) => Err(errors
                .iter()
                .map(|e| format!("In file {name}: {e}"))
                .collect()),
        }
    }

    fn node_names(&self) -> Vec<String> {
        DialogueRunner::node_names(self)
    }

    fn set_start_node(&mut self, name: &str) {
        DialogueRunner::set_start_node(self, name);
    }

    fn start(&mut self) -> Result<(), BoxError> {
        DialogueRunner::start(self).map_err(BoxError::from)
    }

    fn current_node(&self) -> Option<String> {
        DialogueRunner::current_node(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_errors_name_the_file() {
        let mut runner = DialogueRunner::new();
        let errors = DialogueRuntime::compile(&mut runner, "broken", "title: A\n---\n").unwrap_err();
        assert_eq!(errors, vec!["In file broken: node 'A' is not terminated with '==='"]);
        assert!(DialogueRuntime::node_names(&runner).is_empty());
    }

    #[test]
    fn test_compile_registers_nodes() {
        let mut runner = DialogueRunner::new();
        DialogueRuntime::compile(&mut runner, "ok", "title: A\n---\nHi\n===\n").expect("compile");
        assert_eq!(DialogueRuntime::node_names(&runner), vec!["A"]);
    }
}
