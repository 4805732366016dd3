//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};

// Thread-local resolution state for circular dependency detection
thread_local! {
    static RESOLUTION_TLS: RefCell<ResolutionTls> = RefCell::new(ResolutionTls::default());
}

#[derive(Default)]
struct ResolutionTls {
    stack: Vec<String>,
}

/// Guard for one frame of the thread-local resolution stack.
///
/// Entering a key already on the stack reports the full cycle instead of
/// pushing it. The frame is popped when the guard drops, including on early
/// returns through `?`.
pub(crate) struct ResolutionGuard {
    depth: usize,
}

impl ResolutionGuard {
    pub(crate) fn enter(name: String, max_depth: usize) -> DiResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();

            // Circular detection BEFORE pushing the new name
            if let Some(start) = tls.stack.iter().position(|n| *n == name) {
                let mut path = tls.stack[start..].to_vec();
                path.push(name);
                return Err(DiError::Circular(path));
            }

            // Depth guard
            if tls.stack.len() >= max_depth {
                return Err(DiError::DepthExceeded(tls.stack.len()));
            }

            tls.stack.push(name);
            Ok(Self {
                depth: tls.stack.len(),
            })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            debug_assert_eq!(tls.stack.len(), self.depth);
            tls.stack.truncate(self.depth.saturating_sub(1));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_cycle_from_first_occurrence() {
        let _a = ResolutionGuard::enter("a".into(), 16).unwrap();
        let _b = ResolutionGuard::enter("b".into(), 16).unwrap();
        let err = ResolutionGuard::enter("b".into(), 16).err().unwrap();
        match err {
            DiError::Circular(path) => assert_eq!(path, vec!["b", "b"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn frames_pop_on_drop() {
        {
            let _a = ResolutionGuard::enter("a".into(), 16).unwrap();
        }
        let _again = ResolutionGuard::enter("a".into(), 16).unwrap();
    }

    #[test]
    fn depth_is_bounded() {
        let _a = ResolutionGuard::enter("a".into(), 1).unwrap();
        assert!(matches!(
            ResolutionGuard::enter("b".into(), 1),
            Err(DiError::DepthExceeded(1))
        ));
    }
}
