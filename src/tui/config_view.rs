use crate::feed::filter::{FilterSettings, PAINTING, PHOTOGRAPH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Paintings,
    Photographs,
    ShowObscure,
    RequireDescription,
    MinYear,
    MaxYear,
}

pub const FIELDS: [ConfigField; 6] = [
    ConfigField::Paintings,
    ConfigField::Photographs,
    ConfigField::ShowObscure,
    ConfigField::RequireDescription,
    ConfigField::MinYear,
    ConfigField::MaxYear,
];

impl ConfigField {
    pub fn label(self) -> &'static str {
        match self {
            ConfigField::Paintings => "Show paintings",
            ConfigField::Photographs => "Show photographs",
            ConfigField::ShowObscure => "Include more obscure art",
            ConfigField::RequireDescription => "Require a description",
            ConfigField::MinYear => "Earliest year",
            ConfigField::MaxYear => "Latest year",
        }
    }

    fn is_year(self) -> bool {
        matches!(self, ConfigField::MinYear | ConfigField::MaxYear)
    }
}

/// Draft filter settings edited in the config modal. Nothing reaches the
/// engine until the modal closes.
#[derive(Debug, Clone)]
pub struct ConfigViewState {
    pub draft: FilterSettings,
    pub selected: usize,
    pub editing: bool,
    pub edit_buffer: String,
    pub notice: Option<String>,
}

impl ConfigViewState {
    pub fn new(current: FilterSettings) -> Self {
        Self {
            draft: current,
            selected: 0,
            editing: false,
            edit_buffer: String::new(),
            notice: None,
        }
    }

    pub fn selected_field(&self) -> ConfigField {
        FIELDS[self.selected]
    }

    pub fn next(&mut self) {
        if !self.editing {
            self.selected = (self.selected + 1) % FIELDS.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.editing {
            self.selected = (self.selected + FIELDS.len() - 1) % FIELDS.len();
        }
    }

    /// (label, display value) per field.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        FIELDS
            .iter()
            .map(|&field| (field.label(), self.value_of(field)))
            .collect()
    }

    fn value_of(&self, field: ConfigField) -> String {
        let on_off = |b: bool| (if b { "on" } else { "off" }).to_string();
        let year = |y: Option<i32>| y.map(|v| v.to_string()).unwrap_or_else(|| "any".to_string());
        match field {
            ConfigField::Paintings => on_off(self.draft.includes_type(PAINTING)),
            ConfigField::Photographs => on_off(self.draft.includes_type(PHOTOGRAPH)),
            ConfigField::ShowObscure => on_off(self.draft.show_obscure),
            ConfigField::RequireDescription => on_off(self.draft.require_short_description),
            ConfigField::MinYear => year(self.draft.min_year),
            ConfigField::MaxYear => year(self.draft.max_year),
        }
    }

    /// Enter/Space on the selected field: toggle booleans, start editing years.
    pub fn activate(&mut self) {
        self.notice = None;
        let field = self.selected_field();
        match field {
            ConfigField::Paintings | ConfigField::Photographs => {
                let type_id = if field == ConfigField::Paintings { PAINTING } else { PHOTOGRAPH };
                if !self.draft.toggle_type(type_id) {
                    self.notice = Some("At least one artwork type must stay enabled".to_string());
                }
            }
            ConfigField::ShowObscure => self.draft.show_obscure = !self.draft.show_obscure,
            ConfigField::RequireDescription => {
                self.draft.require_short_description = !self.draft.require_short_description
            }
            ConfigField::MinYear | ConfigField::MaxYear => {
                self.editing = true;
                self.edit_buffer = match field {
                    ConfigField::MinYear => self.draft.min_year,
                    _ => self.draft.max_year,
                }
                .map(|y| y.to_string())
                .unwrap_or_default();
            }
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.editing && (c.is_ascii_digit() || (c == '-' && self.edit_buffer.is_empty())) {
            self.edit_buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.editing {
            self.edit_buffer.pop();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
        self.edit_buffer.clear();
    }

    /// Commit the year being edited. An empty buffer clears the bound. A
    /// bound that would invert the range is rejected and editing continues.
    pub fn commit_edit(&mut self) {
        if !self.editing {
            return;
        }
        let field = self.selected_field();
        if !field.is_year() {
            self.cancel_edit();
            return;
        }

        let value = if self.edit_buffer.is_empty() {
            None
        } else {
            match self.edit_buffer.parse::<i32>() {
                Ok(v) => Some(v),
                Err(_) => {
                    self.notice = Some(format!("Not a year: {}", self.edit_buffer));
                    return;
                }
            }
        };

        let (min, max) = match field {
            ConfigField::MinYear => (value, self.draft.max_year),
            _ => (self.draft.min_year, value),
        };
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                self.notice = Some(format!("Earliest year {} is after latest year {}", lo, hi));
                return;
            }
        }

        self.draft.min_year = min;
        self.draft.max_year = max;
        self.notice = None;
        self.cancel_edit();
    }
}
