//! Run the pipeline on a background thread.
//!
//! The caller keeps its own loop responsive and is told about progress through a channel instead
//! of sharing any state with the worker.

use std::thread::JoinHandle;

use crossbeam_channel::Sender;

use crate::{error_chain, report_failure, run, RunRequest, RunSummary, Stage};

/// Messages sent by a running pipeline. A run sends one [RunUpdate::Progress] per stage it
/// reaches, then exactly one of [RunUpdate::Complete] or [RunUpdate::Failed].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunUpdate {
    Progress(Stage),
    Complete(RunSummary),
    Failed { message: String },
}

/// Handle on a pipeline run. Runs cannot be cancelled.
#[derive(Debug)]
pub struct RunHandle {
    thread: JoinHandle<()>,
}

impl RunHandle {
    /// Whether the worker is still busy, e.g: to warn before exiting.
    pub fn is_running(&self) -> bool {
        !self.thread.is_finished()
    }

    /// Wait for the worker to exit.
    pub fn join(self) -> std::thread::Result<()> {
        self.thread.join()
    }
}

/// Start a run of `request` on a new thread, reporting to `sender`.
pub fn spawn_run(request: RunRequest, sender: Sender<RunUpdate>) -> RunHandle {
    let thread = std::thread::spawn(move || {
        let result = run(&request, |stage| {
            tracing::info!(%stage, progress = stage.progress(), "starting stage");
            // The receiver may have gone away, the run carries on regardless
            let _ = sender.send(RunUpdate::Progress(stage));
        });

        let update = match result {
            Ok(summary) => RunUpdate::Complete(summary),
            Err(error) => {
                report_failure(&error);
                RunUpdate::Failed {
                    message: error_chain(&error),
                }
            }
        };
        let _ = sender.send(update);
    });

    RunHandle { thread }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn request(dir: &std::path::Path) -> RunRequest {
        RunRequest::new(
            dir.join("export.csv"),
            dir.join("rni.csv"),
            dir,
            NaiveDate::from_ymd_opt(2025, 4, 5).unwrap(),
        )
    }

    #[test]
    fn successful_run_reports_every_stage() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("export.csv"),
            "SerialNumber,MeterConID,RegisterId,RouteNumber,Location\n1,1,,1,\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("rni.csv"),
            "Meter ID,FlexNet ID,Latitude,Longitude\n1,2,3,4\n",
        )
        .unwrap();

        let (sender, receiver) = crossbeam_channel::unbounded();
        let handle = spawn_run(request(dir.path()), sender);
        let updates: Vec<_> = receiver.iter().collect();
        handle.join().unwrap();

        let mut expected: Vec<_> = Stage::ALL.into_iter().map(RunUpdate::Progress).collect();
        expected.push(RunUpdate::Complete(RunSummary {
            output_path: dir.path().join("SpringbrookUpload040525.csv"),
            rows: 1,
        }));
        assert_eq!(updates, expected);
    }

    #[test]
    fn running_until_updates_are_received() {
        let dir = tempfile::tempdir().unwrap();

        // A rendezvous channel holds the worker on its first update until it is received
        let (sender, receiver) = crossbeam_channel::bounded(0);
        let handle = spawn_run(request(dir.path()), sender);
        assert!(handle.is_running());

        let updates: Vec<_> = receiver.iter().collect();
        assert_eq!(updates.len(), 2);
        while handle.is_running() {
            std::thread::yield_now();
        }
        handle.join().unwrap();
    }

    #[test]
    fn failed_run_reports_a_message() {
        let dir = tempfile::tempdir().unwrap();

        let (sender, receiver) = crossbeam_channel::unbounded();
        let handle = spawn_run(request(dir.path()), sender);
        let updates: Vec<_> = receiver.iter().collect();
        handle.join().unwrap();

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0], RunUpdate::Progress(Stage::Load));
        match &updates[1] {
            RunUpdate::Failed { message } => assert!(message.contains("export.csv"), "{message}"),
            other => panic!("unexpected update: {other:?}"),
        }
    }
}
