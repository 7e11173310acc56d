use latchkey_core::{FieldDescriptor, FieldRole, PageSnapshot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Fields sharing a structural container
    Container,
    /// Fields paired by on-screen proximity
    Formless,
}

/// A set of classified fields that are scored together
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGroup {
    pub kind: GroupKind,
    pub container: Option<String>,
    pub fields: Vec<(FieldDescriptor, FieldRole)>,
    /// Text searched for login wording when scoring
    pub structure_text: String,
    /// Index of the group's first field in the page
    position: usize,
}

impl FieldGroup {
    pub fn position(&self) -> usize {
        self.position
    }
}

pub struct FieldGrouper;

impl FieldGrouper {
    /// Split classified page fields into scoring groups, in document order
    ///
    /// `classified` must be the page's fields, in page order, with their roles.
    pub fn group(
        page: &PageSnapshot,
        classified: &[(FieldDescriptor, FieldRole)],
        max_distance: f64,
    ) -> Vec<FieldGroup> {
        let mut groups = Self::container_groups(page, classified);
        groups.extend(Self::formless_groups(page, classified, max_distance));
        groups.sort_by_key(|g| g.position);

        tracing::debug!(
            "Grouped {} fields on {} into {} groups",
            classified.len(),
            page.origin,
            groups.len()
        );
        groups
    }

    fn container_groups(
        page: &PageSnapshot,
        classified: &[(FieldDescriptor, FieldRole)],
    ) -> Vec<FieldGroup> {
        let mut groups: Vec<FieldGroup> = Vec::new();

        for (index, (field, role)) in classified.iter().enumerate() {
            let Some(container_id) = field.container.as_deref() else {
                continue;
            };

            match groups
                .iter_mut()
                .find(|g| g.container.as_deref() == Some(container_id))
            {
                Some(group) => group.fields.push((field.clone(), *role)),
                None => {
                    let structure_text = page
                        .container(container_id)
                        .map(|c| c.context_text())
                        .unwrap_or_else(|| container_id.to_string());

                    groups.push(FieldGroup {
                        kind: GroupKind::Container,
                        container: Some(container_id.to_string()),
                        fields: vec![(field.clone(), *role)],
                        structure_text,
                        position: index,
                    });
                }
            }
        }

        groups
    }

    /// Pair each formless password with the nearest unpaired username field
    fn formless_groups(
        page: &PageSnapshot,
        classified: &[(FieldDescriptor, FieldRole)],
        max_distance: f64,
    ) -> Vec<FieldGroup> {
        let formless: Vec<usize> = classified
            .iter()
            .enumerate()
            .filter(|(_, (field, _))| field.container.is_none())
            .map(|(index, _)| index)
            .collect();

        let page_text = page.text.clone().unwrap_or_default();
        let mut paired: Vec<usize> = Vec::new();
        let mut groups = Vec::new();

        for &password_index in &formless {
            let (password, role) = &classified[password_index];
            if *role != FieldRole::Password {
                continue;
            }

            let nearest = password.bounds.and_then(|password_bounds| {
                formless
                    .iter()
                    .copied()
                    .filter(|i| !paired.contains(i) && classified[*i].1.is_username_like())
                    .filter_map(|i| {
                        let bounds = classified[i].0.bounds?;
                        let distance = bounds.distance_to(&password_bounds);
                        (distance <= max_distance).then_some((i, distance))
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1))
            });

            let group = match nearest {
                Some((username_index, distance)) => {
                    tracing::debug!(
                        "Paired formless fields {} and {} ({:.0}px apart)",
                        classified[username_index].0.id,
                        password.id,
                        distance
                    );
                    paired.push(username_index);

                    let mut members = [username_index, password_index];
                    members.sort_unstable();
                    FieldGroup {
                        kind: GroupKind::Formless,
                        container: None,
                        fields: members.iter().map(|i| classified[*i].clone()).collect(),
                        structure_text: page_text.clone(),
                        position: members[0],
                    }
                }
                None => FieldGroup {
                    kind: GroupKind::Formless,
                    container: None,
                    fields: vec![(password.clone(), *role)],
                    structure_text: page_text.clone(),
                    position: password_index,
                },
            };
            groups.push(group);
        }

        groups
    }
}
