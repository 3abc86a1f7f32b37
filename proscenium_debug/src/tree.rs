// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Textual scene-tree dumps.

use std::fmt::Write;

use proscenium_core::node::{Content, NodeId, Scene};

/// Renders the subtree rooted at `id` as indented text, one node per line,
/// children in paint order.
///
/// ```text
/// container "stage" NodeId(0@gen0) pos=(0, 0) alpha=1
///   shape "card" NodeId(1@gen0) pos=(10, 20) alpha=0.5 draw=(10, 20)-(60, 70)
/// ```
#[must_use]
pub fn dump(scene: &Scene, id: NodeId) -> String {
    let mut out = String::new();
    if !scene.is_alive(id) {
        let _ = writeln!(out, "<stale {id:?}>");
        return out;
    }
    let mut stack = vec![(id, 0_usize)];
    while let Some((node, depth)) = stack.pop() {
        write_line(scene, node, depth, &mut out);
        stack.extend(
            scene
                .children(node)
                .iter()
                .rev()
                .filter(|&&child| scene.is_alive(child))
                .map(|&child| (child, depth + 1)),
        );
    }
    out
}

fn write_line(scene: &Scene, id: NodeId, depth: usize, out: &mut String) {
    let kind = if scene.is_container(id) {
        "container"
    } else {
        match scene.content(id) {
            Content::None => "empty",
            Content::Shape(_) => "shape",
            Content::Bitmap(_) => "bitmap",
        }
    };
    let p = scene.position(id);
    let _ = write!(
        out,
        "{:indent$}{kind} {:?} {id:?} pos=({}, {}) alpha={}",
        "",
        scene.name(id),
        p.x,
        p.y,
        scene.alpha(id),
        indent = depth * 2,
    );
    if !scene.visible(id) {
        out.push_str(" hidden");
    }
    if scene.is_mask(id) {
        out.push_str(" [mask]");
    }
    if let Some(mask) = scene.mask(id) {
        let _ = write!(out, " mask={mask:?}");
    }
    if !scene.is_container(id) {
        let r = scene.draw_rect(id);
        let _ = write!(out, " draw=({}, {})-({}, {})", r.x0, r.y0, r.x1, r.y1);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Rect};

    #[test]
    fn dump_indents_children() {
        let mut scene = Scene::new();
        let root = scene.root();
        let card = scene.create_shape(Rect::new(0.0, 0.0, 50.0, 50.0));
        scene.set_name(card, "card");
        scene.set_position(card, Point::new(10.0, 20.0));
        scene.set_alpha(card, 0.5);
        scene.add_child(root, card).unwrap();

        let text = dump(&scene, root);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("container \"stage\""), "got: {text}");
        assert!(lines[1].starts_with("  shape \"card\""), "got: {text}");
        assert!(lines[1].contains("pos=(10, 20)"), "got: {text}");
        assert!(lines[1].contains("alpha=0.5"), "got: {text}");
        assert!(lines[1].contains("draw=(10, 20)-(60, 70)"), "got: {text}");
    }

    #[test]
    fn dump_of_stale_handle() {
        let mut scene = Scene::new();
        let id = scene.create_container();
        scene.destroy(id);
        assert!(dump(&scene, id).starts_with("<stale"), "stale marker");
    }
}
