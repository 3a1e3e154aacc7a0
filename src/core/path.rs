use serde_json::Value;

/// Outcome of walking a key path through a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a Value),
    NotFound,
}

impl<'a> Lookup<'a> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn value(self) -> Option<&'a Value> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }

    /// Falls through to `other` only when nothing was found here.
    pub fn or_else(self, other: impl FnOnce() -> Lookup<'a>) -> Lookup<'a> {
        match self {
            Lookup::Found(_) => self,
            Lookup::NotFound => other(),
        }
    }
}

/// Walks `path` through nested objects. Arrays are never indexed and a `null`
/// or scalar in the middle of the path ends the walk with `NotFound`.
pub fn resolve<'a>(record: &'a Value, path: &[&str]) -> Lookup<'a> {
    walk(record, path.iter().copied())
}

/// `resolve` with a dotted path, e.g. `"user.entities.url.urls"`. The empty
/// path is the record itself.
pub fn pluck<'a>(record: &'a Value, dotted: &str) -> Lookup<'a> {
    if dotted.is_empty() {
        return Lookup::Found(record);
    }
    walk(record, dotted.split('.'))
}

fn walk<'a, 'k>(record: &'a Value, keys: impl Iterator<Item = &'k str>) -> Lookup<'a> {
    let mut current = record;
    for key in keys {
        match current {
            Value::Object(map) => match map.get(key) {
                Some(next) => current = next,
                None => return Lookup::NotFound,
            },
            _ => return Lookup::NotFound,
        }
    }
    Lookup::Found(current)
}
