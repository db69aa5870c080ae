use std::fmt;
use std::str::FromStr;

use crate::error::DispatchError;

/// The operations the dispatcher knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GenerateVideo,
    GetVideoStatus,
    CreateTemplate,
    GetTemplate,
    ListTemplates,
}

impl Operation {
    pub const ALL: [Self; 5] = [
        Self::GenerateVideo,
        Self::GetVideoStatus,
        Self::CreateTemplate,
        Self::GetTemplate,
        Self::ListTemplates,
    ];

    /// Registered tool name for this operation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GenerateVideo => "generate_video",
            Self::GetVideoStatus => "get_video_status",
            Self::CreateTemplate => "create_template",
            Self::GetTemplate => "get_template",
            Self::ListTemplates => "list_templates",
        }
    }

}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = DispatchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|operation| operation.name() == value)
            .ok_or_else(|| DispatchError::InvalidOperation(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_registered_name() {
        for operation in Operation::ALL {
            let parsed: Operation = operation.name().parse().expect("registered name");
            assert_eq!(parsed, operation);
        }
    }

    #[test]
    fn rejects_unregistered_names() {
        for name in ["generate", "get", "GET_TEMPLATE", "", " list_templates"] {
            let err = name.parse::<Operation>().expect_err("name should be rejected");
            assert!(matches!(err, DispatchError::InvalidOperation(ref value) if value == name));
        }
    }
}
