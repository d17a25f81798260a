//! GPU driver selection.

use super::packages::{all_installed, gpu};
use crate::host::Privilege;
use crate::steps::{Action, Guard, SelectionLoop, Step};

fn nvidia() -> Vec<Action> {
    vec![
        Action::best_effort("Install the NVIDIA driver", |ctx| {
            ctx.install_packages(gpu::NVIDIA)
        })
        .guarded_by(all_installed(gpu::NVIDIA)),
        Action::best_effort("Build the NVIDIA kernel module", |ctx| {
            ctx.run("akmods --force", Privilege::Root)?;
            ctx.info("The NVIDIA driver is active after the next reboot")
        }),
    ]
}

fn amd() -> Vec<Action> {
    gpu::AMD_SWAPS
        .iter()
        .map(|&(stock, freeworld)| {
            Action::best_effort(format!("Swap {} for {}", stock, freeworld), move |ctx| {
                ctx.run(&format!("dnf swap -y {} {}", stock, freeworld), Privilege::Root)
                    .map(|_| ())
            })
            .guarded_by(Guard::package_installed(freeworld))
        })
        .collect()
}

fn intel() -> Vec<Action> {
    vec![Action::best_effort("Install the Intel media driver", |ctx| {
        ctx.install_packages(gpu::INTEL)
    })
    .guarded_by(all_installed(gpu::INTEL))]
}

/// Driver menu, presented until the user picks "Skip".
pub fn gpu_drivers() -> Step {
    Step::selection(
        "gpu",
        "GPU drivers",
        SelectionLoop::new("Select GPU drivers to install:", "Skip")
            .option("NVIDIA", nvidia())
            .option("AMD", amd())
            .option("Intel", intel()),
    )
}
