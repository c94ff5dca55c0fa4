use crate::layer::LayerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub layer: LayerId,
    pub message: String,
}

/// Attribution messages keyed by the layer that contributed them, in the
/// order the layers were added.
#[derive(Debug, Default)]
pub struct Attributions {
    entries: Vec<Attribution>,
}

impl Attributions {
    pub fn add(&mut self, layer: LayerId, message: impl Into<String>) {
        self.entries.push(Attribution {
            layer,
            message: message.into(),
        });
    }

    pub fn remove(&mut self, layer: LayerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|a| a.layer != layer);
        self.entries.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribution> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All messages joined into one footer line.
    pub fn footer(&self) -> String {
        self.entries
            .iter()
            .map(|a| a.message.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
