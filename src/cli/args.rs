//! Command line arguments

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use super::version::VERSION;
use crate::config::ColorMode;
use crate::error::ArgsError;

const EXAMPLES: &str = "Examples:
  kubectl tree deployment my-app
  kubectl tree deployment/my-app
  kubectl tree deployment my-namespace/my-app
  kubectl tree kservice.v1.serving.knative.dev my-app";

/// Show sub-resources of the Kubernetes object
#[derive(Parser, Debug)]
#[command(name = "kubectl-tree", version = VERSION, after_help = EXAMPLES)]
pub struct Args {
    /// KIND NAME, KIND NAMESPACE/NAME or KIND/NAME
    #[arg(value_name = "KIND [NAME]")]
    pub args: Vec<String>,

    /// Namespace of the object, and the namespace to search for owned objects
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Search for owned objects in every namespace
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Comma separated condition types for the READY column, first match wins
    #[arg(long, value_name = "TYPES")]
    pub condition_types: Option<String>,

    /// When to color the output
    #[arg(long, value_enum)]
    pub color: Option<ColorMode>,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the tree even when listing some resource types failed
    #[arg(long)]
    pub best_effort: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// The object named on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: String,
    pub namespace: Option<String>,
    pub name: String,
}

/// Split positional arguments into kind, optional namespace and name
pub fn split_kind_name(args: &[String]) -> Result<Target, ArgsError> {
    match args {
        [kind, name] => {
            let (namespace, name) = match name.split_once('/') {
                Some((_, rest)) if rest.contains('/') => return Err(ArgsError::InvalidName),
                Some((ns, name)) => (Some(ns.to_string()), name.to_string()),
                None => (None, name.clone()),
            };
            if name.is_empty() {
                return Err(ArgsError::MissingName);
            }
            Ok(Target {
                kind: kind.clone(),
                namespace,
                name,
            })
        }
        [single] => {
            let parts: Vec<&str> = single.split('/').collect();
            match parts.as_slice() {
                [_] => Err(ArgsError::MissingName),
                [kind, name] if !kind.is_empty() && !name.is_empty() => Ok(Target {
                    kind: kind.to_string(),
                    namespace: None,
                    name: name.to_string(),
                }),
                [_, _] => Err(ArgsError::MissingName),
                _ => Err(ArgsError::TooManySlashes),
            }
        }
        _ => Err(ArgsError::Count(args.len())),
    }
}
