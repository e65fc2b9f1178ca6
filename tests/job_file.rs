// tests/job_file.rs

use std::io::Write;

use tempfile::NamedTempFile;

use batchsub::config::{JobFile, load_and_validate, load_from_str};
use batchsub::errors::BatchsubError;
use batchsub::job::{DependencyTarget, JobDuration, Parallelism};
use batchsub::render::{PbsPrinter, ScriptPrinter};
use batchsub::types::{DependencyKind, Dialect, MailType, ParallelismMode};
use batchsub_test_utils::builders::{JobConfigBuilder, JobFileBuilder, test_header};

fn write_job_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn cycle_in_after_links_is_an_invalid_dependency() {
    let file = write_job_file(
        r#"
[job.A]
commands = ["echo A"]
after = "B"

[job.B]
commands = ["echo B"]
after = "A"
"#,
    );

    match load_and_validate(file.path()) {
        Err(BatchsubError::InvalidDependency(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains('A') || msg.contains('B'));
        }
        Err(e) => panic!("expected InvalidDependency, got {e:?}"),
        Ok(_) => panic!("expected InvalidDependency, got Ok"),
    }
}

#[test]
fn unknown_after_target_is_a_config_error() {
    let file = write_job_file(
        r#"
[job.A]
commands = ["echo A"]
after = "missing"
"#,
    );

    match load_and_validate(file.path()) {
        Err(BatchsubError::ConfigError(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("missing"));
        }
        Err(e) => panic!("expected ConfigError, got {e:?}"),
        Ok(_) => panic!("expected ConfigError, got Ok"),
    }
}

#[test]
fn after_and_after_id_are_mutually_exclusive() {
    let raw = JobFileBuilder::new()
        .with_job("A", JobConfigBuilder::new().command("a").build())
        .with_job(
            "B",
            JobConfigBuilder::new()
                .command("b")
                .after("A")
                .after_id("99")
                .build(),
        )
        .raw();

    assert!(matches!(
        JobFile::try_from(raw),
        Err(BatchsubError::ConfigError(_))
    ));
}

#[test]
fn dependency_kind_without_target_is_rejected() {
    let raw = JobFileBuilder::new()
        .with_job(
            "A",
            JobConfigBuilder::new()
                .command("a")
                .dependency(DependencyKind::AfterAny)
                .build(),
        )
        .raw();

    assert!(matches!(
        JobFile::try_from(raw),
        Err(BatchsubError::ConfigError(_))
    ));
}

#[test]
fn self_dependency_is_rejected() {
    let raw = JobFileBuilder::new()
        .with_job("A", JobConfigBuilder::new().command("a").after("A").build())
        .raw();

    assert!(matches!(
        JobFile::try_from(raw),
        Err(BatchsubError::InvalidDependency(_))
    ));
}

#[test]
fn empty_job_file_is_rejected() {
    let raw = load_from_str("[submit]\nscheduler = \"slurm\"\n").unwrap();
    assert!(matches!(
        JobFile::try_from(raw),
        Err(BatchsubError::ConfigError(_))
    ));
}

#[test]
fn malformed_toml_is_a_toml_error() {
    assert!(matches!(
        load_from_str("[job.A\ncommands = 1"),
        Err(BatchsubError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_and_validate(dir.path().join("Jobs.toml")),
        Err(BatchsubError::IoError(_))
    ));
}

#[test]
fn full_job_file_builds_a_plan() {
    let file = write_job_file(
        r#"
[submit]
scheduler = "slurm"
program = "/usr/bin/sbatch"

[default]
account = "ABC"
queue = "batch"
walltime = "24h"
modules = ["orca/3.0"]
purge_modules = true
mail_user = "me@example.org"

[job.prepare]
name = "Prepare data"
walltime = "2h"
parallelism = "openmp"
params = [4]
mail_types = ["begin", "end"]
commands = ["cd /work", "prepare"]

[job.solve]
after = "prepare"
dependency = "after_any"
modules = ["gromacs"]
directives = ["--exclusive"]
commands = ["solve"]

[job.post]
after_id = "12345.server"
shell = "/bin/sh"
commands = ["post"]
"#,
    );

    let job_file = load_and_validate(file.path()).unwrap();
    assert_eq!(job_file.submit.scheduler, Dialect::Slurm);
    assert_eq!(job_file.submit.program.as_deref(), Some("/usr/bin/sbatch"));

    let plan = job_file.build_plan().unwrap();
    assert_eq!(plan.jobs.len(), 3);

    let prepare = plan.jobs.job(plan.key("prepare").unwrap()).unwrap();
    let opts = prepare.options();
    assert_eq!(opts.name.as_deref(), Some("Preparedata"));
    assert_eq!(opts.account.as_deref(), Some("ABC"));
    assert_eq!(opts.queue.as_deref(), Some("batch"));
    assert_eq!(opts.walltime, Some(JobDuration::from_hours(2)));
    assert_eq!(opts.parallelism, Some(Parallelism::OpenMp { processors: 4 }));
    assert_eq!(opts.mail_user.as_deref(), Some("me@example.org"));
    assert_eq!(opts.mail_types.len(), 2);

    let containers = prepare.command_containers();
    assert_eq!(containers.len(), 2);
    assert_eq!(containers[0].name(), "Modules");
    assert_eq!(containers[0].lines(), ["module purge", "module load orca/3.0"]);
    assert_eq!(containers[1].name(), "Shell Commands");
    assert_eq!(containers[1].lines(), ["cd /work", "prepare"]);

    let solve = plan.jobs.job(plan.key("solve").unwrap()).unwrap();
    assert_eq!(solve.options().name.as_deref(), Some("solve"));
    assert_eq!(solve.options().walltime, Some(JobDuration::from_hours(24)));
    assert_eq!(solve.options().custom_directives, vec!["--exclusive"]);
    assert_eq!(
        solve.command_containers()[0].lines(),
        ["module purge", "module load gromacs"]
    );
    let dep = solve.dependency().unwrap();
    assert_eq!(dep.kind, DependencyKind::AfterAny);
    assert_eq!(dep.target, DependencyTarget::Job(plan.key("prepare").unwrap()));

    let post = plan.jobs.job(plan.key("post").unwrap()).unwrap();
    assert_eq!(post.options().shell.as_deref(), Some("/bin/sh"));
    let dep = post.dependency().unwrap();
    assert_eq!(dep.kind, DependencyKind::AfterOk);
    assert_eq!(dep.target, DependencyTarget::External("12345.server".to_string()));
}

#[test]
fn bad_values_surface_when_building_the_plan() {
    let bad_walltime = JobFileBuilder::new()
        .with_job("A", JobConfigBuilder::new().command("a").walltime("ten").build())
        .build();
    assert!(matches!(
        bad_walltime.build_plan(),
        Err(BatchsubError::InvalidDuration(_))
    ));

    let bad_params = JobFileBuilder::new()
        .with_job(
            "A",
            JobConfigBuilder::new()
                .command("a")
                .parallelism(ParallelismMode::Hybrid, &[2])
                .build(),
        )
        .build();
    assert!(matches!(
        bad_params.build_plan(),
        Err(BatchsubError::InvalidParallelism(_))
    ));
}

#[test]
fn unknown_job_name_is_not_found() {
    let plan = JobFileBuilder::new()
        .default_account("X")
        .default_walltime("1h")
        .default_module("python")
        .with_job("only", JobConfigBuilder::new().command("run").build())
        .build()
        .build_plan()
        .unwrap();

    assert!(matches!(plan.key("other"), Err(BatchsubError::JobNotFound(_))));

    let only = plan.jobs.job(plan.key("only").unwrap()).unwrap();
    assert_eq!(only.command_containers()[0].lines(), ["module load python"]);
}

#[test]
fn mail_types_without_a_recipient_are_kept() {
    let raw = load_from_str(
        r#"
[job.notify]
mail_types = ["end", "fail"]
commands = ["run"]
"#,
    )
    .unwrap();
    let plan = JobFile::try_from(raw).unwrap().build_plan().unwrap();

    let job = plan.jobs.job(plan.key("notify").unwrap()).unwrap();
    assert_eq!(job.options().mail_user, None);
    assert_eq!(job.options().mail_types, vec![MailType::End, MailType::Fail]);

    let script = PbsPrinter::with_header(test_header())
        .render(job, None)
        .unwrap();
    assert!(script.directives.contains(&"#PBS -m ea".to_string()));
    assert!(!script.directives.iter().any(|d| d.starts_with("#PBS -M")));
}
