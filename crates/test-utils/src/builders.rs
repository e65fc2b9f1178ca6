#![allow(dead_code)]

use std::collections::BTreeMap;

use batchsub::config::{DefaultSection, JobConfig, JobFile, RawJobFile, SubmitSection};
use batchsub::job::{CommandContainer, JobSpec};
use batchsub::render::ScriptHeader;
use batchsub::types::{DependencyKind, Dialect, ParallelismMode};

/// Fixed header so rendered scripts are deterministic.
pub fn test_header() -> ScriptHeader {
    ScriptHeader {
        user: "tester".to_string(),
        host: "testhost".to_string(),
        date: "Thu 01 January 1970 00:00:00".to_string(),
        version: "0.0.0".to_string(),
    }
}

/// A job with the given name and one "Shell Commands" container.
pub fn shell_job(name: &str, lines: &[&str]) -> JobSpec {
    let mut commands = CommandContainer::shell();
    for line in lines {
        commands.append(*line);
    }

    let mut job = JobSpec::new();
    job.set_name(name).add_command_container(commands);
    job
}

/// Builder for `JobFile` to simplify test setup.
pub struct JobFileBuilder {
    file: RawJobFile,
}

impl JobFileBuilder {
    pub fn new() -> Self {
        Self {
            file: RawJobFile {
                submit: SubmitSection::default(),
                default: DefaultSection::default(),
                job: BTreeMap::new(),
            },
        }
    }

    pub fn scheduler(mut self, dialect: Dialect) -> Self {
        self.file.submit.scheduler = dialect;
        self
    }

    pub fn with_job(mut self, name: &str, job: JobConfig) -> Self {
        self.file.job.insert(name.to_string(), job);
        self
    }

    pub fn default_account(mut self, account: &str) -> Self {
        self.file.default.account = Some(account.to_string());
        self
    }

    pub fn default_walltime(mut self, walltime: &str) -> Self {
        self.file.default.walltime = Some(walltime.to_string());
        self
    }

    pub fn default_module(mut self, module: &str) -> Self {
        self.file.default.modules.push(module.to_string());
        self
    }

    pub fn raw(self) -> RawJobFile {
        self.file
    }

    pub fn build(self) -> JobFile {
        JobFile::try_from(self.file).expect("Failed to build valid job file from builder")
    }
}

impl Default for JobFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `JobConfig`.
pub struct JobConfigBuilder {
    job: JobConfig,
}

impl JobConfigBuilder {
    pub fn new() -> Self {
        Self {
            job: JobConfig::default(),
        }
    }

    pub fn command(mut self, line: &str) -> Self {
        self.job.commands.push(line.to_string());
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.job.name = Some(name.to_string());
        self
    }

    pub fn walltime(mut self, walltime: &str) -> Self {
        self.job.walltime = Some(walltime.to_string());
        self
    }

    pub fn parallelism(mut self, mode: ParallelismMode, params: &[u32]) -> Self {
        self.job.parallelism = Some(mode);
        self.job.params = params.to_vec();
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.job.after = Some(dep.to_string());
        self
    }

    pub fn after_id(mut self, id: &str) -> Self {
        self.job.after_id = Some(id.to_string());
        self
    }

    pub fn dependency(mut self, kind: DependencyKind) -> Self {
        self.job.dependency = Some(kind);
        self
    }

    pub fn module(mut self, module: &str) -> Self {
        self.job.modules.push(module.to_string());
        self
    }

    pub fn build(self) -> JobConfig {
        self.job
    }
}

impl Default for JobConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
