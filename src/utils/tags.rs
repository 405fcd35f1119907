//! Tag merging utilities.

use crate::config::Tags;

/// Merge tag layers, later layers taking precedence over earlier ones
pub fn merge_tags<'a, I>(layers: I) -> Tags
where
    I: IntoIterator<Item = Option<&'a Tags>>,
{
    let mut merged = Tags::new();

    for layer in layers.into_iter().flatten() {
        for (k, v) in layer {
            merged.insert(k.clone(), v.clone());
        }
    }

    merged
}

/// Build a resource's tags: `Name` first, then the given layers.
///
/// A layer that carries its own `Name` key overrides the generated one.
pub fn name_tags<'a, I>(name: &str, layers: I) -> Tags
where
    I: IntoIterator<Item = Option<&'a Tags>>,
{
    let mut tags = Tags::new();
    tags.insert("Name".to_string(), name.to_string());
    tags.extend(merge_tags(layers));
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_later_layers_win() {
        let global = tags(&[("env", "prod"), ("team", "net")]);
        let tier = tags(&[("team", "data")]);
        let az = tags(&[("team", "az-team"), ("zone", "a")]);

        let merged = merge_tags([Some(&global), Some(&tier), Some(&az)]);
        assert_eq!(merged["env"], "prod");
        assert_eq!(merged["team"], "az-team");
        assert_eq!(merged["zone"], "a");
    }

    #[test]
    fn test_missing_layers_are_skipped() {
        let global = tags(&[("env", "dev")]);
        let merged = merge_tags([None, Some(&global), None]);
        assert_eq!(merged, global);
    }

    #[test]
    fn test_name_can_be_overridden() {
        let plain = name_tags("demo-public-a", [None]);
        assert_eq!(plain["Name"], "demo-public-a");

        let custom = tags(&[("Name", "custom")]);
        let overridden = name_tags("demo-public-a", [Some(&custom)]);
        assert_eq!(overridden["Name"], "custom");
    }
}
