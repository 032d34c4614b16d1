use super::node::{Element, Node};
use thiserror::Error;

/// Child-index path from the root to the patched node.
pub type Path = Vec<usize>;

#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    Replace { path: Path, node: Node },
    SetText { path: Path, value: String },
    SetAttr { path: Path, name: String, value: String },
    RemoveAttr { path: Path, name: String },
    Append { path: Path, node: Node },
    Truncate { path: Path, len: usize },
}

#[derive(Error, Debug, PartialEq)]
pub enum PatchError {
    #[error("no node at path {0:?}")]
    MissingNode(Path),

    #[error("patch expected an element at path {0:?}")]
    NotAnElement(Path),
}

/// Minimal patch list turning `old` into `new`. Children are matched by
/// position; a tag change replaces the whole subtree.
pub fn diff(old: &Node, new: &Node) -> Vec<Patch> {
    let mut patches = Vec::new();
    diff_at(old, new, &mut Vec::new(), &mut patches);
    patches
}

fn diff_at(old: &Node, new: &Node, path: &mut Path, patches: &mut Vec<Patch>) {
    match (old, new) {
        (Node::Text(a), Node::Text(b)) => {
            if a != b {
                patches.push(Patch::SetText { path: path.clone(), value: b.clone() });
            }
        }
        (Node::Element(a), Node::Element(b)) if a.tag == b.tag => {
            diff_attrs(a, b, path, patches);
            diff_children(a, b, path, patches);
        }
        _ => patches.push(Patch::Replace { path: path.clone(), node: new.clone() }),
    }
}

fn diff_attrs(old: &Element, new: &Element, path: &Path, patches: &mut Vec<Patch>) {
    for (name, value) in &new.attrs {
        if old.get_attr(name) != Some(value.as_str()) {
            patches.push(Patch::SetAttr {
                path: path.clone(),
                name: name.clone(),
                value: value.clone(),
            });
        }
    }
    for (name, _) in &old.attrs {
        if new.get_attr(name).is_none() {
            patches.push(Patch::RemoveAttr { path: path.clone(), name: name.clone() });
        }
    }
}

fn diff_children(old: &Element, new: &Element, path: &mut Path, patches: &mut Vec<Patch>) {
    let common = old.children.len().min(new.children.len());
    for i in 0..common {
        path.push(i);
        diff_at(&old.children[i], &new.children[i], path, patches);
        path.pop();
    }
    if old.children.len() > new.children.len() {
        patches.push(Patch::Truncate { path: path.clone(), len: new.children.len() });
    }
    for node in &new.children[common..] {
        patches.push(Patch::Append { path: path.clone(), node: node.clone() });
    }
}

fn node_at_mut<'a>(root: &'a mut Node, path: &[usize]) -> Result<&'a mut Node, PatchError> {
    let mut current = root;
    for (depth, &index) in path.iter().enumerate() {
        current = match current {
            Node::Element(element) => element
                .children
                .get_mut(index)
                .ok_or_else(|| PatchError::MissingNode(path[..=depth].to_vec()))?,
            Node::Text(_) => return Err(PatchError::NotAnElement(path[..depth].to_vec())),
        };
    }
    Ok(current)
}

fn element_at_mut<'a>(root: &'a mut Node, path: &[usize]) -> Result<&'a mut Element, PatchError> {
    match node_at_mut(root, path)? {
        Node::Element(element) => Ok(element),
        Node::Text(_) => Err(PatchError::NotAnElement(path.to_vec())),
    }
}

pub fn apply(root: &mut Node, patches: &[Patch]) -> Result<(), PatchError> {
    for patch in patches {
        match patch {
            Patch::Replace { path, node } => *node_at_mut(root, path)? = node.clone(),
            Patch::SetText { path, value } => *node_at_mut(root, path)? = Node::Text(value.clone()),
            Patch::SetAttr { path, name, value } => {
                let element = element_at_mut(root, path)?;
                match element.attrs.iter_mut().find(|(k, _)| k == name) {
                    Some(slot) => slot.1 = value.clone(),
                    None => element.attrs.push((name.clone(), value.clone())),
                }
            }
            Patch::RemoveAttr { path, name } => {
                element_at_mut(root, path)?.attrs.retain(|(k, _)| k != name);
            }
            Patch::Append { path, node } => element_at_mut(root, path)?.children.push(node.clone()),
            Patch::Truncate { path, len } => element_at_mut(root, path)?.children.truncate(*len),
        }
    }
    Ok(())
}
