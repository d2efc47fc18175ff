//! Builds [`CommandDescriptor`] trees from `clap` commands.

use std::collections::{BTreeMap, BTreeSet};

use clap::{Arg, Command};

use super::{ArgumentDescriptor, CommandDescriptor, NumericRange, OptionDescriptor, Param};

/// Metadata `clap` cannot carry, attached by argument id or command path.
///
/// # Examples
///
/// ```
/// use panel_help::descriptor::{Annotations, CommandDescriptor, NumericRange};
///
/// let cmd = clap::Command::new("tool").arg(clap::Arg::new("jobs").long("jobs"));
/// let notes = Annotations::new().range("jobs", NumericRange::from_bounds(&(1..=16)));
/// let desc = CommandDescriptor::from_clap_with(&cmd, &notes);
/// let jobs = desc.options().find(|opt| opt.id == "jobs").expect("jobs option");
/// assert_eq!(jobs.range.as_ref().and_then(NumericRange::describe).as_deref(), Some("1<=x<=16"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    deprecated_args: BTreeSet<String>,
    deprecated_commands: BTreeSet<String>,
    ranges: BTreeMap<String, NumericRange>,
}

impl Annotations {
    /// No annotations.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            deprecated_args: BTreeSet::new(),
            deprecated_commands: BTreeSet::new(),
            ranges: BTreeMap::new(),
        }
    }

    /// Marks every argument with this id deprecated.
    #[must_use]
    pub fn deprecate_arg(mut self, id: impl Into<String>) -> Self {
        self.deprecated_args.insert(id.into());
        self
    }

    /// Marks the command at this space-joined path deprecated.
    #[must_use]
    pub fn deprecate_command(mut self, path: impl Into<String>) -> Self {
        self.deprecated_commands.insert(path.into());
        self
    }

    /// Attaches a numeric range to every argument with this id.
    #[must_use]
    pub fn range(mut self, id: impl Into<String>, range: NumericRange) -> Self {
        self.ranges.insert(id.into(), range);
        self
    }
}

impl CommandDescriptor {
    /// Describes `command` and all of its subcommands.
    #[must_use]
    pub fn from_clap(command: &Command) -> Self {
        Self::from_clap_with(command, &Annotations::new())
    }

    /// Describes `command`, applying `annotations`.
    ///
    /// The command is cloned and built first so that `clap`'s generated help
    /// and version flags and subcommand bin names are present.
    #[must_use]
    pub fn from_clap_with(command: &Command, annotations: &Annotations) -> Self {
        let mut built = command.clone();
        built.build();
        let path = built
            .get_bin_name()
            .unwrap_or_else(|| built.get_name())
            .to_owned();
        describe_command(&mut built, path, annotations)
    }
}

fn describe_command(
    command: &mut Command,
    path: String,
    annotations: &Annotations,
) -> CommandDescriptor {
    let usage = strip_usage_prefix(&command.render_usage().to_string());
    let params = command
        .get_arguments()
        .map(|arg| describe_arg(arg, annotations))
        .collect();
    let subcommands = command
        .get_subcommands_mut()
        .map(|sub| {
            let sub_path = format!("{path} {}", sub.get_name());
            describe_command(sub, sub_path, annotations)
        })
        .collect();
    CommandDescriptor {
        name: command.get_name().to_owned(),
        usage,
        help: command
            .get_long_about()
            .or_else(|| command.get_about())
            .map(ToString::to_string),
        short_help: command.get_about().map(ToString::to_string),
        epilog: command
            .get_after_long_help()
            .or_else(|| command.get_after_help())
            .map(ToString::to_string),
        deprecated: annotations.deprecated_commands.contains(&path),
        hidden: command.is_hide_set(),
        aliases: command
            .get_visible_aliases()
            .map(ToOwned::to_owned)
            .collect(),
        params,
        subcommands,
        path,
    }
}

fn strip_usage_prefix(rendered: &str) -> String {
    let plain = console::strip_ansi_codes(rendered);
    let trimmed = plain.trim();
    trimmed
        .strip_prefix("Usage:")
        .map_or(trimmed, str::trim_start)
        .to_owned()
}

fn describe_arg(arg: &Arg, annotations: &Annotations) -> Param {
    let id = arg.get_id().as_str().to_owned();
    let takes_value = arg.get_action().takes_values();
    let help = arg
        .get_help()
        .or_else(|| arg.get_long_help())
        .map(ToString::to_string);
    let default = default_value(arg, takes_value);
    let envvar = arg
        .get_env()
        .filter(|_| !arg.is_hide_env_set())
        .map(|name| name.to_string_lossy().into_owned());
    let value_name = arg
        .get_value_names()
        .and_then(<[_]>::first)
        .map(ToString::to_string);
    let range = annotations.ranges.get(&id).cloned();
    let deprecated = annotations.deprecated_args.contains(&id);

    if arg.is_positional() {
        let variadic = arg
            .get_num_args()
            .is_some_and(|count| count.max_values() > 1);
        return Param::Argument(ArgumentDescriptor {
            metavar: value_name.unwrap_or_else(|| id.to_uppercase()),
            id,
            variadic,
            help,
            default,
            required: arg.is_required_set(),
            deprecated,
            hidden: arg.is_hide_set(),
            range,
            envvar,
        });
    }

    Param::Option(OptionDescriptor {
        id,
        flags: flag_forms(arg),
        secondary_flags: Vec::new(),
        metavar: value_name.filter(|_| takes_value),
        possible_values: possible_values(arg),
        takes_value,
        help,
        default,
        required: arg.is_required_set(),
        deprecated,
        hidden: arg.is_hide_set(),
        range,
        show_envvar: envvar.is_some(),
        envvar,
    })
}

fn flag_forms(arg: &Arg) -> Vec<String> {
    let shorts = arg
        .get_short()
        .into_iter()
        .chain(arg.get_visible_short_aliases().unwrap_or_default())
        .map(|short| format!("-{short}"));
    let longs = arg
        .get_long()
        .into_iter()
        .chain(arg.get_visible_aliases().unwrap_or_default())
        .map(|long| format!("--{long}"));
    shorts.chain(longs).collect()
}

fn possible_values(arg: &Arg) -> Vec<String> {
    if arg.is_hide_possible_values_set() || !arg.get_action().takes_values() {
        return Vec::new();
    }
    arg.get_possible_values()
        .iter()
        .filter(|value| !value.is_hide_set())
        .map(|value| value.get_name().to_owned())
        .collect()
}

fn default_value(arg: &Arg, takes_value: bool) -> Option<String> {
    if !takes_value || arg.is_hide_default_value_set() {
        return None;
    }
    let values: Vec<String> = arg
        .get_default_values()
        .iter()
        .map(|value| value.to_string_lossy().into_owned())
        .collect();
    (!values.is_empty()).then(|| values.join(", "))
}
