//! Partitioning of a command's options or subcommands into named groups.
//!
//! Groups come from configuration keyed by command path. Each declared
//! [`GroupSpec`] lists identifiers (flags, argument ids or metavars,
//! subcommand names or aliases) in the order they should be shown. Items no
//! spec claims fall into a trailing unnamed group.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::descriptor::{ArgumentDescriptor, CommandDescriptor, OptionDescriptor};

/// One declared group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Panel title; the configured default title is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identifiers of the members, in display order.
    #[serde(alias = "options", alias = "commands")]
    pub items: Vec<String>,
}

impl GroupSpec {
    /// A named group over `items`.
    #[must_use]
    pub fn new(name: impl Into<String>, items: &[&str]) -> Self {
        Self {
            name: Some(name.into()),
            items: items.iter().map(|&item| item.to_owned()).collect(),
        }
    }
}

/// Group declarations keyed by space-joined command path.
pub type GroupMap = BTreeMap<String, Vec<GroupSpec>>;

/// Anything a [`GroupSpec`] can refer to.
pub trait Identified {
    /// Every identifier the item answers to.
    fn identifiers(&self) -> Vec<&str>;
}

impl<T: Identified + ?Sized> Identified for &T {
    fn identifiers(&self) -> Vec<&str> {
        (**self).identifiers()
    }
}

impl Identified for OptionDescriptor {
    fn identifiers(&self) -> Vec<&str> {
        self.flags
            .iter()
            .chain(&self.secondary_flags)
            .map(String::as_str)
            .chain([self.id.as_str()])
            .collect()
    }
}

impl Identified for ArgumentDescriptor {
    fn identifiers(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.metavar.as_str()]
    }
}

impl Identified for CommandDescriptor {
    fn identifiers(&self) -> Vec<&str> {
        [self.name.as_str()]
            .into_iter()
            .chain(self.aliases.iter().map(String::as_str))
            .collect()
    }
}

/// A group after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGroup<T> {
    /// Declared name, or `None` for the implicit group.
    pub name: Option<String>,
    /// Members in display order.
    pub items: Vec<T>,
}

/// Declared groups and leftover items, kept apart so callers can route the
/// leftovers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<T> {
    /// Non-empty declared groups in declaration order.
    pub declared: Vec<ResolvedGroup<T>>,
    /// Items no group claimed, in their original order.
    pub ungrouped: Vec<T>,
}

impl<T> Resolution<T> {
    /// Flattens into the display order: declared groups, then one unnamed
    /// group holding the leftovers if there are any.
    #[must_use]
    pub fn into_groups(self) -> Vec<ResolvedGroup<T>> {
        let mut groups = self.declared;
        if !self.ungrouped.is_empty() {
            groups.push(ResolvedGroup {
                name: None,
                items: self.ungrouped,
            });
        }
        groups
    }
}

/// Resolves `items` against the groups declared for `command_path`.
///
/// When an item is claimed by more than one spec, the last spec wins and a
/// warning is logged. Unknown identifiers are dropped.
///
/// # Examples
///
/// ```
/// use panel_help::groups::{GroupMap, GroupSpec, resolve};
/// use panel_help::descriptor::OptionDescriptor;
///
/// let name = OptionDescriptor::new("name", &["--name"]);
/// let force = OptionDescriptor::new("force", &["--force"]);
/// let mut map = GroupMap::new();
/// map.insert("mytool".into(), vec![GroupSpec::new("Basic", &["--name"])]);
///
/// let groups = resolve("mytool", &[&name, &force], &map).into_groups();
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].name.as_deref(), Some("Basic"));
/// assert_eq!(groups[1].items[0].id, "force");
/// ```
#[must_use]
pub fn resolve<T>(command_path: &str, items: &[T], groups: &GroupMap) -> Resolution<T>
where
    T: Identified + Clone,
{
    let Some(specs) = groups.get(command_path) else {
        return Resolution {
            declared: Vec::new(),
            ungrouped: items.to_vec(),
        };
    };

    let mut owner: Vec<Option<usize>> = vec![None; items.len()];
    let mut claims: Vec<Vec<usize>> = Vec::with_capacity(specs.len());
    for (spec_index, spec) in specs.iter().enumerate() {
        let mut claimed: Vec<usize> = Vec::new();
        for identifier in &spec.items {
            let Some(item_index) = items
                .iter()
                .position(|item| item.identifiers().contains(&identifier.as_str()))
            else {
                tracing::debug!(
                    command = command_path,
                    identifier = identifier.as_str(),
                    "dropping unknown group identifier"
                );
                continue;
            };
            if claimed.contains(&item_index) {
                continue;
            }
            if let Some(slot) = owner.get_mut(item_index) {
                if let Some(previous) = *slot {
                    let earlier = specs.get(previous).and_then(|prior| prior.name.as_deref());
                    tracing::warn!(
                        command = command_path,
                        identifier = identifier.as_str(),
                        previous_group = ?earlier,
                        group = ?spec.name.as_deref(),
                        "item claimed by more than one group; the later group wins"
                    );
                }
                *slot = Some(spec_index);
            }
            claimed.push(item_index);
        }
        claims.push(claimed);
    }

    let declared = specs
        .iter()
        .zip(claims)
        .enumerate()
        .filter_map(|(spec_index, (spec, claimed))| {
            let members: Vec<T> = claimed
                .into_iter()
                .filter(|&item_index| {
                    owner.get(item_index) == Some(&Some(spec_index))
                })
                .filter_map(|item_index| items.get(item_index).cloned())
                .collect();
            (!members.is_empty()).then(|| ResolvedGroup {
                name: spec.name.clone(),
                items: members,
            })
        })
        .collect();
    let ungrouped = items
        .iter()
        .zip(&owner)
        .filter(|(_, claimed_by)| claimed_by.is_none())
        .map(|(item, _)| item.clone())
        .collect();
    Resolution {
        declared,
        ungrouped,
    }
}
