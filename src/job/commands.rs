// src/job/commands.rs

//! Named, ordered groups of shell command lines that make up a job body.

use std::fmt;

/// Name given to the container created by [`CommandContainer::shell`].
pub const SHELL_COMMANDS: &str = "Shell Commands";

/// Name given to the container produced by [`ModuleSet`].
pub const MODULES: &str = "Modules";

/// Programs commonly called from job scripts.
///
/// `Other` covers anything else; it is still an explicit name, never a
/// method synthesised at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    Cd,
    Export,
    Module,
    Source,
    Mpirun,
    Srun,
    Other(String),
}

impl Program {
    pub fn as_str(&self) -> &str {
        match self {
            Program::Cd => "cd",
            Program::Export => "export",
            Program::Module => "module",
            Program::Source => "source",
            Program::Mpirun => "mpirun",
            Program::Srun => "srun",
            Program::Other(name) => name,
        }
    }
}

/// Ordered list of command lines with a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContainer {
    name: String,
    lines: Vec<String>,
}

impl CommandContainer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
        }
    }

    /// Empty container named "Shell Commands".
    pub fn shell() -> Self {
        Self::new(SHELL_COMMANDS)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append one command line.
    pub fn append(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    /// Append `<program> <args...>`.
    pub fn program<I, S>(&mut self, program: Program, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut line = program.as_str().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg.as_ref());
        }
        self.append(line)
    }

    pub fn cd(&mut self, dir: impl AsRef<str>) -> &mut Self {
        self.program(Program::Cd, [dir])
    }

    pub fn export(&mut self, var: impl AsRef<str>, value: impl AsRef<str>) -> &mut Self {
        let assignment = format!("{}=\"{}\"", var.as_ref(), value.as_ref());
        self.program(Program::Export, [assignment])
    }

    pub fn get_header(&self) -> String {
        format!("# {}", self.name)
    }

    /// Command lines joined by newlines, without the header.
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }

    /// Header comment followed by the command lines.
    pub fn render(&self) -> String {
        format!("{}\n{}", self.get_header(), self.body())
    }
}

impl fmt::Display for CommandContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Environment-modules setup for a job.
///
/// Whatever the call order, the rendered lines are: `module purge` (if
/// requested), every `module unload`, then every `module load`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSet {
    purge: bool,
    unload: Vec<String>,
    load: Vec<String>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn purge(&mut self) -> &mut Self {
        self.purge = true;
        self
    }

    pub fn load(&mut self, module: impl Into<String>) -> &mut Self {
        self.load.push(module.into());
        self
    }

    pub fn load_all<I, S>(&mut self, modules: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.load.extend(modules.into_iter().map(Into::into));
        self
    }

    pub fn unload(&mut self, module: impl Into<String>) -> &mut Self {
        self.unload.push(module.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.purge && self.unload.is_empty() && self.load.is_empty()
    }

    /// Build the "Modules" command container.
    pub fn to_container(&self) -> CommandContainer {
        let mut container = CommandContainer::new(MODULES);
        if self.purge {
            container.program(Program::Module, ["purge"]);
        }
        for module in &self.unload {
            container.program(Program::Module, ["unload", module.as_str()]);
        }
        for module in &self.load {
            container.program(Program::Module, ["load", module.as_str()]);
        }
        container
    }
}

impl From<ModuleSet> for CommandContainer {
    fn from(modules: ModuleSet) -> Self {
        modules.to_container()
    }
}
