//! Operation registry.
//!
//! The registry is the closed catalogue of actions the model is allowed to
//! request and the dispatcher is allowed to execute. Nothing outside this
//! table can reach the social API.

use serde::Serialize;
use std::fmt;

/// Smallest accepted result-count limit.
pub const MIN_LIMIT: u32 = 1;
/// Largest accepted result-count limit.
pub const MAX_LIMIT: u32 = 100;
/// Maximum length of a post body, in characters.
pub const MAX_POST_CHARS: usize = 280;
/// Maximum length of a search query, in characters.
pub const MAX_QUERY_CHARS: usize = 512;
/// Maximum length of an account handle, without the leading `@`.
pub const MAX_HANDLE_CHARS: usize = 15;
/// Maximum number of digits in a post identifier.
pub const MAX_TWEET_ID_DIGITS: usize = 19;

/// One supported category of API action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Profile,
    Tweets,
    Search,
    Post,
    Like,
    Unlike,
    Timeline,
    Delete,
}

impl Operation {
    /// Every operation, in catalogue order.
    pub const ALL: [Operation; 8] = [
        Operation::Profile,
        Operation::Tweets,
        Operation::Search,
        Operation::Post,
        Operation::Like,
        Operation::Unlike,
        Operation::Timeline,
        Operation::Delete,
    ];

    /// Wire name used in prompts and model output.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Profile => "profile",
            Operation::Tweets => "tweets",
            Operation::Search => "search",
            Operation::Post => "post",
            Operation::Like => "like",
            Operation::Unlike => "unlike",
            Operation::Timeline => "timeline",
            Operation::Delete => "delete",
        }
    }

    /// Parse a wire name. Surrounding whitespace and ASCII case are ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(name))
    }

    /// Whether executing this operation changes state on the platform.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Operation::Post | Operation::Like | Operation::Unlike | Operation::Delete
        )
    }

    /// The static spec for this operation.
    pub fn spec(self) -> &'static OperationSpec {
        // OPERATIONS is laid out in declaration order of the enum.
        &OPERATIONS[self as usize]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic type of a parameter, with its constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Account handle: letters, digits and underscores, leading `@` tolerated.
    Handle,
    /// Free text with a character bound.
    Text { max_chars: usize },
    /// Numeric post identifier, carried as a string.
    TweetId,
    /// Result-count limit within an inclusive range.
    Limit { min: u32, max: u32 },
}

impl ParamType {
    /// Short type name shown to the model and in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamType::Handle => "handle",
            ParamType::Text { .. } => "string",
            ParamType::TweetId => "tweet id",
            ParamType::Limit { .. } => "integer",
        }
    }

    /// Human-readable constraint rendered into prompts.
    pub fn constraint(&self) -> String {
        match self {
            ParamType::Handle => format!(
                "account name without '@', 1-{} letters, digits or underscores",
                MAX_HANDLE_CHARS
            ),
            ParamType::Text { max_chars } => format!("1-{} characters", max_chars),
            ParamType::TweetId => "numeric post id as a string of digits".to_string(),
            ParamType::Limit { min, max } => format!("{}..={}", min, max),
        }
    }
}

/// Whether a parameter must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
    /// Optional with a default applied when absent.
    Default(u32),
}

/// A declared parameter of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub ty: ParamType,
    pub requirement: Requirement,
}

impl ParamSpec {
    pub fn is_required(&self) -> bool {
        self.requirement == Requirement::Required
    }
}

/// Shape of a successful result, used by presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultShape {
    User,
    Tweets,
    Tweet,
    Ack,
}

/// Immutable description of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSpec {
    pub operation: Operation,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    pub result: ResultShape,
}

impl OperationSpec {
    pub fn name(&self) -> &'static str {
        self.operation.name()
    }

    /// Look up a declared parameter by exact name.
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn required(&self) -> impl Iterator<Item = &'static ParamSpec> {
        self.params.iter().filter(|p| p.is_required())
    }

    pub fn optional(&self) -> impl Iterator<Item = &'static ParamSpec> {
        self.params.iter().filter(|p| !p.is_required())
    }
}

const LIMIT: ParamType = ParamType::Limit {
    min: MIN_LIMIT,
    max: MAX_LIMIT,
};

const USERNAME: ParamSpec = ParamSpec {
    name: "username",
    ty: ParamType::Handle,
    requirement: Requirement::Required,
};

const TWEET_ID: ParamSpec = ParamSpec {
    name: "tweet_id",
    ty: ParamType::TweetId,
    requirement: Requirement::Required,
};

static OPERATIONS: [OperationSpec; 8] = [
    OperationSpec {
        operation: Operation::Profile,
        description: "Look up an account's public profile.",
        params: &[USERNAME],
        result: ResultShape::User,
    },
    OperationSpec {
        operation: Operation::Tweets,
        description: "Fetch the most recent posts written by an account.",
        params: &[
            USERNAME,
            ParamSpec {
                name: "limit",
                ty: LIMIT,
                requirement: Requirement::Default(10),
            },
        ],
        result: ResultShape::Tweets,
    },
    OperationSpec {
        operation: Operation::Search,
        description: "Search recent posts matching a query.",
        params: &[
            ParamSpec {
                name: "query",
                ty: ParamType::Text {
                    max_chars: MAX_QUERY_CHARS,
                },
                requirement: Requirement::Required,
            },
            ParamSpec {
                name: "limit",
                ty: LIMIT,
                requirement: Requirement::Default(10),
            },
        ],
        result: ResultShape::Tweets,
    },
    OperationSpec {
        operation: Operation::Post,
        description: "Publish a new post, optionally as a reply.",
        params: &[
            ParamSpec {
                name: "text",
                ty: ParamType::Text {
                    max_chars: MAX_POST_CHARS,
                },
                requirement: Requirement::Required,
            },
            ParamSpec {
                name: "media_path",
                ty: ParamType::Text { max_chars: 4096 },
                requirement: Requirement::Optional,
            },
            ParamSpec {
                name: "reply_to_id",
                ty: ParamType::TweetId,
                requirement: Requirement::Optional,
            },
        ],
        result: ResultShape::Tweet,
    },
    OperationSpec {
        operation: Operation::Like,
        description: "Like a post.",
        params: &[TWEET_ID],
        result: ResultShape::Ack,
    },
    OperationSpec {
        operation: Operation::Unlike,
        description: "Remove a like from a post.",
        params: &[TWEET_ID],
        result: ResultShape::Ack,
    },
    OperationSpec {
        operation: Operation::Timeline,
        description: "Fetch the authenticated user's home timeline.",
        params: &[ParamSpec {
            name: "limit",
            ty: LIMIT,
            requirement: Requirement::Default(20),
        }],
        result: ResultShape::Tweets,
    },
    OperationSpec {
        operation: Operation::Delete,
        description: "Delete one of the authenticated user's posts.",
        params: &[TWEET_ID],
        result: ResultShape::Ack,
    },
];

/// The set of operations enabled for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRegistry {
    enabled: Vec<Operation>,
}

impl OperationRegistry {
    /// Registry with every supported operation.
    pub fn standard() -> Self {
        Self {
            enabled: Operation::ALL.to_vec(),
        }
    }

    /// Registry restricted to the given operations, kept in catalogue order.
    pub fn with_operations(operations: &[Operation]) -> Self {
        let enabled = Operation::ALL
            .into_iter()
            .filter(|op| operations.contains(op))
            .collect();
        Self { enabled }
    }

    /// Registry without operations that change platform state.
    pub fn read_only() -> Self {
        let enabled = Operation::ALL
            .into_iter()
            .filter(|op| !op.is_mutating())
            .collect();
        Self { enabled }
    }

    /// Look up an enabled operation by wire name.
    pub fn lookup(&self, name: &str) -> Option<&'static OperationSpec> {
        Operation::from_name(name)
            .filter(|op| self.enabled.contains(op))
            .map(Operation::spec)
    }

    pub fn contains(&self, operation: Operation) -> bool {
        self.enabled.contains(&operation)
    }

    /// Enabled specs, in catalogue order.
    pub fn specs(&self) -> impl Iterator<Item = &'static OperationSpec> + '_ {
        self.enabled.iter().map(|op| op.spec())
    }

    /// Comma-separated list of enabled operation names.
    pub fn names(&self) -> String {
        self.enabled
            .iter()
            .map(|op| op.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_enum_order() {
        for op in Operation::ALL {
            assert_eq!(op.spec().operation, op);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = OperationRegistry::standard();
        assert_eq!(registry.lookup("Tweets").unwrap().operation, Operation::Tweets);
        assert_eq!(registry.lookup(" profile ").unwrap().operation, Operation::Profile);
        assert!(registry.lookup("retweet").is_none());
    }

    #[test]
    fn test_read_only_registry_hides_mutations() {
        let registry = OperationRegistry::read_only();
        assert!(registry.lookup("post").is_none());
        assert!(registry.lookup("delete").is_none());
        assert!(registry.lookup("search").is_some());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_with_operations_keeps_catalogue_order() {
        let registry =
            OperationRegistry::with_operations(&[Operation::Timeline, Operation::Profile]);
        assert_eq!(registry.names(), "profile, timeline");
    }

    #[test]
    fn test_required_and_optional_split() {
        let post = Operation::Post.spec();
        let required: Vec<_> = post.required().map(|p| p.name).collect();
        let optional: Vec<_> = post.optional().map(|p| p.name).collect();
        assert_eq!(required, vec!["text"]);
        assert_eq!(optional, vec!["media_path", "reply_to_id"]);
    }
}
