//! Read-only description of a command tree.
//!
//! The renderer works from [`CommandDescriptor`] rather than from `clap`
//! directly. [`CommandDescriptor::from_clap`] builds one from a
//! [`clap::Command`]; tests and other front ends may assemble it by hand.

mod from_clap;

use std::fmt::Display;
use std::ops::{Bound, RangeBounds};

pub use from_clap::Annotations;

/// One command: its metadata, parameters and subcommands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// The command's own name.
    pub name: String,
    /// Space-joined path from the root command, e.g. `mytool sync`.
    pub path: String,
    /// Usage text without the `Usage:` prefix.
    pub usage: String,
    /// Full description.
    pub help: Option<String>,
    /// One-line description used in a parent's command panel.
    pub short_help: Option<String>,
    /// Text shown after the panels.
    pub epilog: Option<String>,
    /// Whether the command is deprecated.
    pub deprecated: bool,
    /// Whether the command is hidden from its parent's listing.
    pub hidden: bool,
    /// Visible alternative names.
    pub aliases: Vec<String>,
    /// Options and positional arguments in declaration order.
    pub params: Vec<Param>,
    /// Subcommands in declaration order.
    pub subcommands: Vec<CommandDescriptor>,
}

impl CommandDescriptor {
    /// A root command named `name` with `name [OPTIONS]` as usage.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let command: String = name.into();
        Self {
            path: command.clone(),
            usage: format!("{command} [OPTIONS]"),
            name: command,
            ..Self::default()
        }
    }

    /// Sets the full description.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the one-line description.
    #[must_use]
    pub fn with_short_help(mut self, help: impl Into<String>) -> Self {
        self.short_help = Some(help.into());
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_param(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Appends a subcommand, rewriting its path (and its children's) to sit
    /// under this command.
    #[must_use]
    pub fn with_subcommand(mut self, mut subcommand: Self) -> Self {
        subcommand.reparent(&self.path);
        self.subcommands.push(subcommand);
        self
    }

    fn reparent(&mut self, parent: &str) {
        let old = std::mem::take(&mut self.path);
        self.path = format!("{parent} {}", self.name);
        if let Some(rest) = self.usage.strip_prefix(old.as_str()) {
            self.usage = format!("{}{rest}", self.path);
        }
        let path = self.path.clone();
        for child in &mut self.subcommands {
            child.reparent(&path);
        }
    }

    /// Returns `true` when the command has subcommands.
    #[must_use]
    pub fn is_group(&self) -> bool {
        !self.subcommands.is_empty()
    }

    /// Options in declaration order, hidden ones included.
    pub fn options(&self) -> impl Iterator<Item = &OptionDescriptor> {
        self.params.iter().filter_map(|param| match param {
            Param::Option(option) => Some(option),
            Param::Argument(_) => None,
        })
    }

    /// Positional arguments in declaration order, hidden ones included.
    pub fn arguments(&self) -> impl Iterator<Item = &ArgumentDescriptor> {
        self.params.iter().filter_map(|param| match param {
            Param::Argument(argument) => Some(argument),
            Param::Option(_) => None,
        })
    }

    /// Finds a direct subcommand by name or alias.
    #[must_use]
    pub fn subcommand(&self, name: &str) -> Option<&Self> {
        self.subcommands.iter().find(|sub| {
            sub.name == name || sub.aliases.iter().any(|alias| alias == name)
        })
    }

    /// Follows `args` (program name first) down the tree and returns the
    /// deepest command they name.
    ///
    /// Flags and the word `help` are skipped, as is the word after an option
    /// that takes a separate value. Unknown words are ignored and scanning
    /// stops at `--`.
    #[must_use]
    pub fn find_invoked<S: AsRef<str>>(&self, args: &[S]) -> &Self {
        let mut lineage = vec![self];
        let mut current = self;
        let mut words = args.iter().skip(1).map(AsRef::as_ref);
        while let Some(arg) = words.next() {
            if arg == "--" {
                break;
            }
            if arg.starts_with('-') {
                if expects_separate_value(&lineage, arg) {
                    words.next();
                }
                continue;
            }
            if arg == "help" {
                continue;
            }
            if let Some(next) = current.subcommand(arg) {
                current = next;
                lineage.push(next);
            }
        }
        current
    }

    fn option_for_flag(&self, flag: &str) -> Option<&OptionDescriptor> {
        self.options().find(|option| {
            option.flags.iter().any(|candidate| candidate == flag)
        })
    }
}

/// Whether `arg` is an option whose value arrives as the following word.
/// Global options are looked up in every command on the way down.
fn expects_separate_value(lineage: &[&CommandDescriptor], arg: &str) -> bool {
    let takes_value = |flag: &str| {
        lineage
            .iter()
            .rev()
            .find_map(|command| command.option_for_flag(flag))
            .is_some_and(|option| option.takes_value)
    };
    if arg.starts_with("--") {
        return !arg.contains('=') && takes_value(arg);
    }
    // A short cluster such as `-vp`: the first value-taking flag consumes the
    // rest of the cluster, or the next word when it ends the cluster.
    let shorts: Vec<char> = arg.chars().skip(1).collect();
    for (position, short) in shorts.iter().enumerate() {
        if takes_value(&format!("-{short}")) {
            return position + 1 == shorts.len();
        }
    }
    false
}

/// An option or a positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// A flag-introduced option.
    Option(OptionDescriptor),
    /// A positional argument.
    Argument(ArgumentDescriptor),
}

impl Param {
    /// Whether the parameter is hidden from help.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        match self {
            Self::Option(option) => option.hidden,
            Self::Argument(argument) => argument.hidden,
        }
    }
}

impl From<OptionDescriptor> for Param {
    fn from(option: OptionDescriptor) -> Self {
        Self::Option(option)
    }
}

impl From<ArgumentDescriptor> for Param {
    fn from(argument: ArgumentDescriptor) -> Self {
        Self::Argument(argument)
    }
}

/// A flag-introduced option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "mirrors independent clap argument settings"
)]
pub struct OptionDescriptor {
    /// Stable identifier.
    pub id: String,
    /// Flag forms such as `-n`, `--name` and visible aliases.
    pub flags: Vec<String>,
    /// Negating flag forms such as `--no-color`.
    pub secondary_flags: Vec<String>,
    /// Declared value name.
    pub metavar: Option<String>,
    /// Accepted values, when restricted.
    pub possible_values: Vec<String>,
    /// Whether the option consumes a value.
    pub takes_value: bool,
    /// Help text.
    pub help: Option<String>,
    /// Default value; `None` means there is none.
    pub default: Option<String>,
    /// Whether the option must be given.
    pub required: bool,
    /// Whether the option is deprecated.
    pub deprecated: bool,
    /// Whether the option is hidden from help.
    pub hidden: bool,
    /// Accepted numeric range.
    pub range: Option<NumericRange>,
    /// Environment variable the value may come from.
    pub envvar: Option<String>,
    /// Whether to show the environment variable.
    pub show_envvar: bool,
}

impl OptionDescriptor {
    /// An option with the given id and flag forms that takes no value.
    #[must_use]
    pub fn new(id: impl Into<String>, flags: &[&str]) -> Self {
        Self {
            id: id.into(),
            flags: flags.iter().map(|&flag| flag.to_owned()).collect(),
            ..Self::default()
        }
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the value name; the option then takes a value.
    #[must_use]
    pub fn with_metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self.takes_value = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the environment variable and shows it.
    #[must_use]
    pub fn with_envvar(mut self, name: impl Into<String>) -> Self {
        self.envvar = Some(name.into());
        self.show_envvar = true;
        self
    }
}

/// A positional argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    /// Stable identifier.
    pub id: String,
    /// Displayed name.
    pub metavar: String,
    /// Whether several values are accepted.
    pub variadic: bool,
    /// Help text.
    pub help: Option<String>,
    /// Default value; `None` means there is none.
    pub default: Option<String>,
    /// Whether the argument must be given.
    pub required: bool,
    /// Whether the argument is deprecated.
    pub deprecated: bool,
    /// Whether the argument is hidden from help.
    pub hidden: bool,
    /// Accepted numeric range.
    pub range: Option<NumericRange>,
    /// Environment variable the value may come from.
    pub envvar: Option<String>,
}

impl ArgumentDescriptor {
    /// An argument whose metavar is the upper-cased id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let key: String = id.into();
        Self {
            metavar: key.to_uppercase(),
            id: key,
            ..Self::default()
        }
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Bounds on a numeric parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericRange {
    /// Lower bound.
    pub min: Bound<String>,
    /// Upper bound.
    pub max: Bound<String>,
}

impl NumericRange {
    /// Captures the bounds of any range over displayable values.
    ///
    /// # Examples
    ///
    /// ```
    /// use panel_help::descriptor::NumericRange;
    ///
    /// assert_eq!(NumericRange::from_bounds(&(1..=10)).describe().as_deref(), Some("1<=x<=10"));
    /// assert_eq!(NumericRange::from_bounds(&(0..)).describe().as_deref(), Some("x>=0"));
    /// assert_eq!(NumericRange::from_bounds(&(..5)).describe().as_deref(), Some("x<5"));
    /// ```
    #[must_use]
    pub fn from_bounds<T: Display>(range: &impl RangeBounds<T>) -> Self {
        Self {
            min: range.start_bound().map(ToString::to_string),
            max: range.end_bound().map(ToString::to_string),
        }
    }

    /// Describes the range as `1<=x<=10`, `x>=0` or `x<5`; `None` when
    /// unbounded on both sides.
    #[must_use]
    pub fn describe(&self) -> Option<String> {
        let lower = match &self.min {
            Bound::Included(value) => Some((value, "<=")),
            Bound::Excluded(value) => Some((value, "<")),
            Bound::Unbounded => None,
        };
        let upper = match &self.max {
            Bound::Included(value) => Some(("<=", value)),
            Bound::Excluded(value) => Some(("<", value)),
            Bound::Unbounded => None,
        };
        match (lower, upper) {
            (Some((low, low_op)), Some((high_op, high))) => {
                Some(format!("{low}{low_op}x{high_op}{high}"))
            }
            (Some((low, low_op)), None) => {
                let flipped = if low_op == "<=" { ">=" } else { ">" };
                Some(format!("x{flipped}{low}"))
            }
            (None, Some((high_op, high))) => Some(format!("x{high_op}{high}")),
            (None, None) => None,
        }
    }
}
