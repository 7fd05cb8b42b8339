use anyhow::Context;
use std::error::Error;
use std::str::FromStr;

/// Resolves a variable name to its raw value, if set.
pub type EnvLookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Unset and empty variables are treated the same way.
pub fn read(lookup: &EnvLookup, env_var: &str) -> Option<String> {
    lookup(env_var).filter(|value| !value.trim().is_empty())
}

pub trait FromEnv: Sized {
    fn from_env(lookup: &EnvLookup, env_var: &str) -> anyhow::Result<Option<Self>>;

    fn from_env_or(lookup: &EnvLookup, env_var: &str, default: Self) -> anyhow::Result<Self> {
        Ok(Self::from_env(lookup, env_var)?.unwrap_or(default))
    }
}

impl<T: FromStr> FromEnv for T
where
    <T as FromStr>::Err: 'static + Error + Send + Sync,
{
    fn from_env(lookup: &EnvLookup, env_var: &str) -> anyhow::Result<Option<Self>> {
        match read(lookup, env_var) {
            Some(value) => {
                let parsed = T::from_str(value.trim())
                    .with_context(|| format!("{env_var} has an invalid value: {value:?}"))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }
}
