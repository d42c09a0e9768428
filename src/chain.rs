//! Deferred command chains.
//!
//! A body can register work synchronously and defer the real execution:
//! steps queue up on a [`CommandChain`] and run in order after the body
//! returns. The soft adapter appends one final step to a chained body, so
//! aggregation happens only after every queued step, and every check those
//! steps issue, has executed.

use std::collections::VecDeque;

use anyhow::Result;

use crate::context::TestContext;

type Step = Box<dyn FnOnce(&TestContext) -> Result<()> + Send>;

/// FIFO queue of deferred steps for one test body.
#[derive(Default)]
pub struct CommandChain {
    steps: VecDeque<Step>,
}

impl CommandChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the end of the chain.
    pub fn then<F>(mut self, step: F) -> Self
    where
        F: FnOnce(&TestContext) -> Result<()> + Send + 'static,
    {
        self.steps.push_back(Box::new(step));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run all steps in order. The first `Err` stops the chain; remaining
    /// steps (including an appended reporting step) never run.
    pub(crate) fn run(mut self, ctx: &TestContext) -> Result<()> {
        while let Some(step) = self.steps.pop_front() {
            step(ctx)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for CommandChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandChain")
            .field("steps", &self.steps.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn steps_run_in_registration_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let (a, b, c) = (order.clone(), order.clone(), order.clone());

        let chain = CommandChain::new()
            .then(move |_| {
                a.lock().unwrap().push(1);
                Ok(())
            })
            .then(move |_| {
                b.lock().unwrap().push(2);
                Ok(())
            })
            .then(move |_| {
                c.lock().unwrap().push(3);
                Ok(())
            });

        let ctx = TestContext::new("chain");
        chain.run(&ctx).unwrap();
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn first_error_stops_the_chain() {
        let later_steps = Arc::new(AtomicUsize::new(0));
        let counter = later_steps.clone();

        let chain = CommandChain::new()
            .then(|_| Err(anyhow!("step exploded")))
            .then(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });

        let ctx = TestContext::new("chain");
        let err = chain.run(&ctx).unwrap_err();
        assert_eq!(err.to_string(), "step exploded");
        assert_eq!(later_steps.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_chain_is_fine() {
        let ctx = TestContext::new("chain");
        assert!(CommandChain::new().run(&ctx).is_ok());
        assert!(CommandChain::new().is_empty());
        assert_eq!(CommandChain::new().then(|_| Ok(())).len(), 1);
    }
}
