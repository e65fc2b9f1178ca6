// tests/job_model.rs

use batchsub::errors::BatchsubError;
use batchsub::job::spec::sanitize_name;
use batchsub::job::{
    CommandContainer, DependencyTarget, JobOption, JobSet, JobSpec, ModuleSet, Parallelism,
    Program,
};
use batchsub::types::{DependencyKind, ParallelismMode};
use batchsub_test_utils::builders::shell_job;

#[test]
fn names_are_stripped_to_alphanumerics() {
    let mut job = JobSpec::new();
    job.set_name("My Sim! #42");
    assert_eq!(job.options().name.as_deref(), Some("MySim42"));
}

#[test]
fn names_are_truncated_to_fifteen_characters() {
    let mut job = JobSpec::new();
    job.set_name("a_very-long name for a job");
    assert_eq!(job.options().name.as_deref(), Some("averylongnamefo"));
}

#[test]
fn names_keep_only_ascii_letters_and_digits() {
    let mut job = JobSpec::new();
    job.set_name("Simulación 2");
    assert_eq!(job.options().name.as_deref(), Some("Simulacin2"));

    assert_eq!(sanitize_name("Ωmega_ß-run 7"), "megarun7");
}

#[test]
fn a_name_without_alphanumerics_clears_the_name() {
    let mut job = JobSpec::new();
    job.set_name("keep");
    job.set_name("!!! ---");
    assert_eq!(job.options().name, None);
}

#[test]
fn new_jobs_use_bash() {
    let job = JobSpec::new();
    assert_eq!(job.options().shell.as_deref(), Some("/bin/bash"));
    assert!(!job.is_submitted());
}

#[test]
fn parallelism_checks_parameter_count() {
    let mut job = JobSpec::new();

    let cases: [(ParallelismMode, &[u32]); 4] = [
        (ParallelismMode::Serial, &[1]),
        (ParallelismMode::OpenMp, &[]),
        (ParallelismMode::Mpi, &[2, 2]),
        (ParallelismMode::Hybrid, &[4]),
    ];
    for (mode, params) in cases {
        assert!(
            matches!(
                job.set_parallelism(mode, params),
                Err(BatchsubError::InvalidParallelism(_))
            ),
            "{mode} with {params:?} should be rejected"
        );
    }
    assert_eq!(job.options().parallelism, None);
}

#[test]
fn parallelism_rejects_zero_parameters() {
    let mut job = JobSpec::new();
    assert!(matches!(
        job.set_hybrid(0, 4),
        Err(BatchsubError::InvalidParallelism(_))
    ));
}

#[test]
fn the_last_parallelism_mode_wins() {
    let mut job = JobSpec::new();
    job.set_openmp(4).unwrap();
    job.set_mpi(16).unwrap();

    assert_eq!(
        job.options().parallelism,
        Some(Parallelism::Mpi { nodes: 16 })
    );

    job.set_serial();
    assert_eq!(job.options().parallelism.map(|p| p.mode()), Some(ParallelismMode::Serial));
}

#[test]
fn mode_names_parse_from_text() {
    assert_eq!("openmp".parse::<ParallelismMode>(), Ok(ParallelismMode::OpenMp));
    assert_eq!("MPI".parse::<ParallelismMode>(), Ok(ParallelismMode::Mpi));
    assert!("threads".parse::<ParallelismMode>().is_err());
    assert_eq!("after_not_ok".parse::<DependencyKind>(), Ok(DependencyKind::AfterNotOk));
}

#[test]
fn get_id_before_submission_fails() {
    let job = shell_job("pending", &["run"]);
    match job.get_id() {
        Err(BatchsubError::NotSubmitted(name)) => assert_eq!(name, "pending"),
        other => panic!("expected NotSubmitted, got {other:?}"),
    }
}

#[test]
fn array_size_zero_clears_the_array() {
    let mut job = JobSpec::new();
    job.set_job_array_size(5);
    assert_eq!(job.options().job_array_size, Some(5));
    job.set_job_array_size(0);
    assert_eq!(job.options().job_array_size, None);
}

#[test]
fn option_values_can_be_applied_as_data() {
    let mut job = JobSpec::new();
    for option in [
        JobOption::Name("Data Job".to_string()),
        JobOption::Queue("short".to_string()),
        JobOption::Memory(1024),
        JobOption::CustomDirective("-V".to_string()),
        JobOption::Shell(None),
    ] {
        job.set_option(option).unwrap();
    }

    let options = job.options();
    assert_eq!(options.name.as_deref(), Some("DataJob"));
    assert_eq!(options.queue.as_deref(), Some("short"));
    assert_eq!(options.memory, Some(1024));
    assert_eq!(options.custom_directives, vec!["-V"]);
    assert_eq!(options.shell, None);
}

#[test]
fn parallelism_given_as_data_is_validated() {
    let mut job = JobSpec::new();
    job.set_openmp(2).unwrap();

    for bad in [
        Parallelism::OpenMp { processors: 0 },
        Parallelism::Mpi { nodes: 0 },
        Parallelism::Hybrid {
            nodes: 2,
            processors_per_node: 0,
        },
    ] {
        assert!(
            matches!(
                job.set_option(JobOption::Parallelism(bad)),
                Err(BatchsubError::InvalidParallelism(_))
            ),
            "{bad:?} should be rejected"
        );
    }
    assert_eq!(
        job.options().parallelism,
        Some(Parallelism::OpenMp { processors: 2 })
    );

    job.set_option(JobOption::Parallelism(Parallelism::Hybrid {
        nodes: 2,
        processors_per_node: 8,
    }))
    .unwrap();
    assert_eq!(job.options().parallelism.map(|p| p.cpu_time_multiplier()), Some(16));
}

#[test]
fn dependency_can_be_cleared() {
    let mut job = JobSpec::new();
    job.depends_on_external("77", DependencyKind::AfterOk).unwrap();
    assert!(job.dependency().is_some());

    job.clear_dependency();
    assert!(job.dependency().is_none());
}

#[test]
fn external_dependency_needs_a_usable_identifier() {
    let mut job = JobSpec::new();
    assert!(matches!(
        job.depends_on_external("", DependencyKind::AfterOk),
        Err(BatchsubError::InvalidDependency(_))
    ));
    assert!(matches!(
        job.depends_on_external("12 34", DependencyKind::AfterOk),
        Err(BatchsubError::InvalidDependency(_))
    ));

    job.depends_on_external("1234.server", DependencyKind::AfterAny)
        .unwrap();
    let dep = job.dependency().unwrap();
    assert_eq!(dep.target, DependencyTarget::External("1234.server".to_string()));
    assert_eq!(dep.kind, DependencyKind::AfterAny);
}

#[test]
fn containers_keep_lines_in_order() {
    let mut container = CommandContainer::shell();
    container
        .cd("/work")
        .export("OMP_NUM_THREADS", "4")
        .program(Program::Mpirun, ["-np", "4", "./app"])
        .program(Program::Other("python3".to_string()), ["post.py"])
        .append("echo done");

    assert_eq!(container.name(), "Shell Commands");
    assert_eq!(container.get_header(), "# Shell Commands");
    assert_eq!(
        container.lines(),
        [
            "cd /work",
            "export OMP_NUM_THREADS=\"4\"",
            "mpirun -np 4 ./app",
            "python3 post.py",
            "echo done",
        ]
    );
    assert_eq!(
        container.render(),
        "# Shell Commands\ncd /work\nexport OMP_NUM_THREADS=\"4\"\nmpirun -np 4 ./app\npython3 post.py\necho done"
    );
}

#[test]
fn modules_render_purge_then_unload_then_load() {
    let mut modules = ModuleSet::new();
    modules.load("orca/3.0").unload("intel").purge().load("openmpi");

    let container: CommandContainer = modules.into();

    assert_eq!(container.name(), "Modules");
    assert_eq!(
        container.lines(),
        [
            "module purge",
            "module unload intel",
            "module load orca/3.0",
            "module load openmpi",
        ]
    );
}

#[test]
fn linking_jobs_records_the_target() {
    let mut set = JobSet::new();
    let a = set.add(shell_job("a", &["a"]));
    let b = set.add(shell_job("b", &["b"]));

    set.depends_on(b, a, DependencyKind::AfterOk).unwrap();

    let dep = set.job(b).unwrap().dependency().unwrap();
    assert_eq!(dep.target, DependencyTarget::Job(a));
    assert_eq!(set.submission_order(b).unwrap(), vec![a, b]);
    assert_eq!(set.submission_order(a).unwrap(), vec![a]);
    assert_eq!(set.keys().collect::<Vec<_>>(), vec![a, b]);
    assert_eq!(set.len(), 2);
}

#[test]
fn cycles_and_self_links_are_refused() {
    let mut set = JobSet::new();
    let a = set.add(shell_job("a", &["a"]));
    let b = set.add(shell_job("b", &["b"]));
    let c = set.add(shell_job("c", &["c"]));

    set.depends_on(b, a, DependencyKind::AfterOk).unwrap();
    set.depends_on(c, b, DependencyKind::AfterOk).unwrap();

    assert!(matches!(
        set.depends_on(a, c, DependencyKind::AfterOk),
        Err(BatchsubError::InvalidDependency(_))
    ));
    assert!(matches!(
        set.depends_on(a, a, DependencyKind::AfterOk),
        Err(BatchsubError::InvalidDependency(_))
    ));
    assert!(set.job(a).unwrap().dependency().is_none());
}

#[test]
fn unknown_keys_are_reported() {
    let mut set = JobSet::new();
    let a = set.add(shell_job("a", &["a"]));
    let mut other = JobSet::new();
    other.add(shell_job("x", &["x"]));
    let ghost = other.add(shell_job("y", &["y"]));

    assert!(matches!(
        set.depends_on(a, ghost, DependencyKind::AfterOk),
        Err(BatchsubError::InvalidDependency(_))
    ));
    assert!(matches!(set.job(ghost), Err(BatchsubError::JobNotFound(_))));
}

#[test]
fn unsubmitted_target_cannot_be_resolved() {
    let mut set = JobSet::new();
    let a = set.add(shell_job("a", &["a"]));
    let b = set.add(shell_job("b", &["b"]));
    set.depends_on(b, a, DependencyKind::After).unwrap();

    assert!(matches!(
        set.resolve_dependency(b),
        Err(BatchsubError::UnresolvedDependency(_))
    ));
    assert_eq!(set.resolve_dependency(a).unwrap(), None);
}
