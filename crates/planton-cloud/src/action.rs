//! Resource change summaries
//!
//! A [`Plan`] lists what a program would do to its stack. Built from a
//! program alone every resource is a create; `pulumi preview` output yields
//! the real counts through [`PlanSummary::from_preview_output`].

use crate::program::Program;
use serde::Serialize;
use std::fmt;

/// What happens to one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Create,
    Update,
    Delete,
    Unchanged,
}

impl ActionType {
    /// Marker used in plan listings
    pub fn symbol(self) -> &'static str {
        match self {
            ActionType::Create => "+",
            ActionType::Update => "~",
            ActionType::Delete => "-",
            ActionType::Unchanged => " ",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionType::Create => "create",
            ActionType::Update => "update",
            ActionType::Delete => "delete",
            ActionType::Unchanged => "unchanged",
        })
    }
}

/// One planned resource change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub action_type: ActionType,
    /// Logical name within the program
    pub resource_name: String,
    /// e.g. `aws:dynamodb:Table`
    pub type_token: String,
    /// Explicit provider resources are listed but carry no cloud state
    pub is_provider: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub actions: Vec<Action>,
}

impl Plan {
    pub fn from_program(program: &Program) -> Self {
        let actions = program
            .resources()
            .map(|(name, resource)| Action {
                action_type: ActionType::Create,
                resource_name: name.to_string(),
                type_token: resource.type_token.clone(),
                is_provider: resource.is_provider(),
            })
            .collect();
        Self { actions }
    }

    pub fn has_changes(&self) -> bool {
        self.actions
            .iter()
            .any(|a| a.action_type != ActionType::Unchanged)
    }

    fn count(&self, action_type: ActionType) -> usize {
        self.actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .count()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            create: self.count(ActionType::Create),
            update: self.count(ActionType::Update),
            delete: self.count(ActionType::Delete),
            no_change: self.count(ActionType::Unchanged),
        }
    }
}

/// Change counts per action type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub no_change: usize,
}

impl PlanSummary {
    /// Read the `Resources:` block printed by `pulumi preview`
    ///
    /// ```text
    /// Resources:
    ///     + 2 to create
    ///     ~ 1 to update
    ///     4 unchanged
    /// ```
    ///
    /// Returns `None` when the output has no such block. Replacements count
    /// as updates.
    pub fn from_preview_output(output: &str) -> Option<Self> {
        let mut lines = output.lines().skip_while(|l| l.trim() != "Resources:");
        lines.next()?;

        let mut summary = Self::default();
        for line in lines {
            let line = line.trim().trim_start_matches(['+', '~', '-']).trim();
            let Some((count, label)) = line.split_once(' ') else {
                break;
            };
            let Ok(count) = count.parse::<usize>() else {
                break;
            };
            match label.trim() {
                "to create" => summary.create += count,
                "to update" | "to replace" => summary.update += count,
                "to delete" => summary.delete += count,
                "unchanged" => summary.no_change += count,
                _ => {}
            }
        }
        Some(summary)
    }

    pub fn total_changes(&self) -> usize {
        self.create + self.update + self.delete
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to delete, {} unchanged",
            self.create, self.update, self.delete, self.no_change
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Resource;

    #[test]
    fn test_plan_from_program() {
        let mut program = Program::new("web");
        program
            .register("aws-provider", Resource::new("pulumi:providers:aws"))
            .unwrap();
        program
            .register(
                "web",
                Resource::new("aws:ec2:SecurityGroup").property("vpcId", "vpc-1"),
            )
            .unwrap();

        let plan = Plan::from_program(&program);
        assert!(plan.has_changes());
        assert_eq!(plan.actions.len(), 2);
        assert!(plan.actions[0].is_provider);
        assert_eq!(plan.actions[1].resource_name, "web");
        assert_eq!(plan.actions[1].type_token, "aws:ec2:SecurityGroup");
        assert_eq!(
            plan.summary().to_string(),
            "2 to create, 0 to update, 0 to delete, 0 unchanged"
        );
    }

    #[test]
    fn test_empty_program_has_no_changes() {
        let plan = Plan::from_program(&Program::new("empty"));
        assert!(!plan.has_changes());
        assert_eq!(plan.summary(), PlanSummary::default());
    }

    #[test]
    fn test_summary_from_preview_output() {
        let output = "\
Previewing update (acme/orders/prod)

     Type                     Name   Plan
 +   pulumi:pulumi:Stack      orders create

Resources:
    + 2 to create
    ~ 1 to update
    +-1 to replace
    4 unchanged

Duration: 3s
";
        let summary = PlanSummary::from_preview_output(output).unwrap();
        assert_eq!(
            summary,
            PlanSummary {
                create: 2,
                update: 2,
                delete: 0,
                no_change: 4,
            }
        );
        assert_eq!(summary.total_changes(), 4);
    }

    #[test]
    fn test_preview_output_without_resources_block() {
        assert_eq!(PlanSummary::from_preview_output("error: no stack"), None);
    }

    #[test]
    fn test_action_type_symbols() {
        assert_eq!(ActionType::Create.symbol(), "+");
        assert_eq!(ActionType::Delete.to_string(), "delete");
    }
}
