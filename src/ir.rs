use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("input is not a valid family document: {0}")]
    Decode(#[from] json5::Error),
    #[error("person `{0}` appears more than once in the input")]
    DuplicateKey(String),
    #[error("partner `{0}` declares relationships of their own")]
    PartnerDeclaresRelationships(String),
    #[error("person `{key}` is reachable at generation {assigned} and again at generation {conflicting}")]
    GenerationConflict {
        key: String,
        assigned: u32,
        conflicting: u32,
    },
    #[error("unknown person `{0}`")]
    UnknownPerson(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PersonId(pub u32);

impl PersonId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RelationshipId(pub u32);

impl RelationshipId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

/// One person record in the arena. Exactly one of the following holds:
/// the person is the root (`parent` and `married_into` both `None`), the
/// person entered as a child (`parent` set), or the person entered as the
/// partner side of a relationship (`married_into` set).
#[derive(Debug, Clone)]
pub struct Person {
    pub id: PersonId,
    pub key: String,
    pub name: String,
    pub image: Option<String>,
    pub gender: Option<Gender>,
    pub generation: u32,
    /// Relationships this person anchors, in presentation order once
    /// `order_relationships` has run.
    pub relationships: Vec<RelationshipId>,
    /// Anchor person and relationship that produced this person as a child.
    pub parent: Option<(PersonId, RelationshipId)>,
    /// Relationship this person joined as the partner.
    pub married_into: Option<RelationshipId>,
}

impl Person {
    pub fn is_root(&self) -> bool {
        self.parent.is_none() && self.married_into.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Relationship {
    pub id: RelationshipId,
    pub anchor: PersonId,
    pub partner: Option<PersonId>,
    pub married: bool,
    pub children: Vec<PersonId>,
    pub primary: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonInput {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub relationships: Vec<RelationshipInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipInput {
    #[serde(default)]
    pub partner: Option<Box<PersonInput>>,
    #[serde(default)]
    pub married: bool,
    #[serde(default)]
    pub children: Vec<PersonInput>,
}

impl PersonInput {
    pub fn from_json5(text: &str) -> Result<Self, StructureError> {
        Ok(json5::from_str(text)?)
    }
}

#[derive(Debug, Clone)]
pub struct FamilyGraph {
    pub people: Vec<Person>,
    pub relationships: Vec<Relationship>,
    pub root: PersonId,
    keys: BTreeMap<String, PersonId>,
}

impl FamilyGraph {
    pub fn build(input: &PersonInput) -> Result<Self, StructureError> {
        let mut graph = FamilyGraph {
            people: Vec::new(),
            relationships: Vec::new(),
            root: PersonId(0),
            keys: BTreeMap::new(),
        };
        graph.root = graph.add_subtree(input)?;
        Ok(graph)
    }

    pub fn from_json5(text: &str) -> Result<Self, StructureError> {
        let input = PersonInput::from_json5(text)?;
        Self::build(&input)
    }

    pub fn person(&self, id: PersonId) -> &Person {
        &self.people[id.index()]
    }

    pub fn relationship(&self, id: RelationshipId) -> &Relationship {
        &self.relationships[id.index()]
    }

    pub fn person_by_key(&self, key: &str) -> Option<PersonId> {
        self.keys.get(key).copied()
    }

    pub fn require_person(&self, key: &str) -> Result<PersonId, StructureError> {
        self.person_by_key(key)
            .ok_or_else(|| StructureError::UnknownPerson(key.to_string()))
    }

    /// Depth-first presentation order: each person, then the partners of
    /// their relationships in order, then each child's subtree.
    pub fn traversal(&self) -> Vec<PersonId> {
        let mut order = Vec::with_capacity(self.people.len());
        self.traverse_into(self.root, &mut order);
        order
    }

    fn traverse_into(&self, person: PersonId, order: &mut Vec<PersonId>) {
        order.push(person);
        let record = self.person(person);
        for &relationship in &record.relationships {
            if let Some(partner) = self.relationship(relationship).partner {
                order.push(partner);
            }
        }
        for &relationship in &record.relationships {
            let children = self.relationship(relationship).children.clone();
            for child in children {
                self.traverse_into(child, order);
            }
        }
    }

    fn add_person(&mut self, input: &PersonInput) -> Result<PersonId, StructureError> {
        if self.keys.contains_key(&input.id) {
            return Err(StructureError::DuplicateKey(input.id.clone()));
        }
        let id = PersonId(self.people.len() as u32);
        self.people.push(Person {
            id,
            key: input.id.clone(),
            name: input.name.clone(),
            image: input.image.clone(),
            gender: input.gender,
            generation: 0,
            relationships: Vec::new(),
            parent: None,
            married_into: None,
        });
        self.keys.insert(input.id.clone(), id);
        Ok(id)
    }

    fn add_subtree(&mut self, input: &PersonInput) -> Result<PersonId, StructureError> {
        let anchor = self.add_person(input)?;
        for relationship in &input.relationships {
            let id = RelationshipId(self.relationships.len() as u32);
            let partner = match relationship.partner.as_deref() {
                Some(partner_input) => {
                    if !partner_input.relationships.is_empty() {
                        return Err(StructureError::PartnerDeclaresRelationships(
                            partner_input.id.clone(),
                        ));
                    }
                    let partner_id = self.add_person(partner_input)?;
                    self.people[partner_id.index()].married_into = Some(id);
                    Some(partner_id)
                }
                None => None,
            };
            self.relationships.push(Relationship {
                id,
                anchor,
                partner,
                married: relationship.married,
                children: Vec::new(),
                primary: false,
            });
            self.people[anchor.index()].relationships.push(id);
            for child_input in &relationship.children {
                let child = self.add_subtree(child_input)?;
                self.people[child.index()].parent = Some((anchor, id));
                self.relationships[id.index()].children.push(child);
            }
        }
        Ok(anchor)
    }
}
