//! Zero-sized stage markers for `Workflow<S>`.

use cos_core::WorkflowState;

mod sealed {
    pub trait Sealed {}
}

pub trait Stage: sealed::Sealed {
    const STATE: WorkflowState;
}

macro_rules! stage {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl Stage for $name {
            const STATE: WorkflowState = WorkflowState::$name;
        }
    };
}

stage!(Draft);
stage!(Validated);
stage!(Planned);
stage!(Converged);
stage!(Halted);
stage!(Executed);
