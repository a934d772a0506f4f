pub mod orchestration;

pub use orchestration::{
    build_controller, run_apply, run_info, ApplyArgs, HookApplyReport, HookInfoReport, InfoArgs,
};
