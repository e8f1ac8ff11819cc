// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The flat settings interface of the external engines.
//!
//! Both OSKAR applications are configured with `group/key = value` pairs,
//! where every value is a string. Typed configurations are only turned into a
//! [`SettingsTree`] when they are handed to an engine.


use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indexmap::IndexMap;

/// An ordered map of settings keys to values, for one application.
///
/// Insertion order is kept, so the same sequence of [`SettingsTree::set`]
/// calls always produces byte-identical output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsTree {
    app: String,
    entries: IndexMap<String, String>,
}

impl SettingsTree {
    /// Create an empty tree for the named application (e.g.
    /// "oskar_imager").
    pub fn new(app: &str) -> Self {
        Self {
            app: app.to_string(),
            entries: IndexMap::new(),
        }
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    /// Set a value. If the key already exists, its value is replaced but
    /// its position is kept.
    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render the tree as an INI file. Each top-level group becomes a
    /// section (in order of first appearance); the rest of each key is kept
    /// as is.
    pub fn to_ini(&self) -> String {
        let mut groups: IndexMap<&str, Vec<(&str, &str)>> = IndexMap::new();
        for (key, value) in self.iter() {
            let (group, sub_key) = key.split_once('/').unwrap_or(("General", key));
            groups.entry(group).or_default().push((sub_key, value));
        }

        let mut ini = format!("[General]\napp={}\n", self.app);
        for (group, entries) in groups {
            ini.push('\n');
            ini.push_str(&format!("[{group}]\n"));
            for (key, value) in entries {
                ini.push_str(&format!("{key}={value}\n"));
            }
        }
        ini
    }

    pub fn write_ini(&self, file: &Path) -> Result<(), std::io::Error> {
        let mut f = BufWriter::new(File::create(file)?);
        f.write_all(self.to_ini().as_bytes())?;
        f.flush()
    }
}

impl<'a> IntoIterator for &'a SettingsTree {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Stringify a float so that it can be parsed back into exactly the same
/// value. There is always a decimal point or an exponent, e.g. "60.0".
pub fn float_value(x: f64) -> String {
    format!("{x:?}")
}

pub fn bool_value(b: bool) -> String {
    if b { "true" } else { "false" }.to_string()
}
