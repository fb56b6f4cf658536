#![allow(dead_code)]

use std::time::Duration;

use pkglaunch::config::ConfigProvider;
use pkglaunch::engine::{Invocation, Orchestrator};
use pkglaunch::exec::ProcessLauncher;
use pkglaunch::fs::mock::MockFileSystem;
use pkglaunch::stages::LaunchOptions;
use pkglaunch::types::ShowMode;
use pkglaunch_test_utils::fakes::{FakeProbe, FakeServices, RecordingReporter};
use pkglaunch_test_utils::init_tracing;

pub const PKG: &str = "/pkg";

/// Fast timings so elevated non-wait monitors don't slow the suite down.
pub fn test_options() -> LaunchOptions {
    LaunchOptions {
        input_idle_timeout: Duration::from_millis(10),
        elevation_grace: Duration::ZERO,
    }
}

/// Everything an orchestrator run touches, all in memory.
pub struct Harness {
    pub services: FakeServices,
    pub fs: MockFileSystem,
    pub probe: FakeProbe,
    pub reporter: RecordingReporter,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        Self {
            services: FakeServices::new(),
            fs: MockFileSystem::new(),
            probe: FakeProbe::installed(),
            reporter: RecordingReporter::new(),
        }
    }

    pub fn with_probe(mut self, probe: FakeProbe) -> Self {
        self.probe = probe;
        self
    }

    pub async fn run(&self, provider: &dyn ConfigProvider, arguments: &str) -> i32 {
        let orchestrator = Orchestrator::new(
            ProcessLauncher::new(self.services.clone()),
            provider,
            &self.probe,
            &self.reporter,
            &self.fs,
        )
        .with_options(test_options());

        orchestrator
            .run(&Invocation {
                arguments: arguments.to_string(),
                show_mode: ShowMode::NORMAL,
            })
            .await
    }
}
