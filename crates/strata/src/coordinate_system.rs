//! Rotate or mirror the graph so the core phases only ever lay out top to bottom.

use crate::model::{LayoutGraph, RankDir};

pub fn adjust(g: &mut LayoutGraph) {
    if g.graph().rankdir.is_horizontal() {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut LayoutGraph) {
    let rankdir = g.graph().rankdir;
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if rankdir.is_horizontal() {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, node| std::mem::swap(&mut node.width, &mut node.height));
    g.for_each_edge_mut(|_, edge| std::mem::swap(&mut edge.width, &mut edge.height));
    for label in g.graph_mut().edge_labels.iter_mut() {
        std::mem::swap(&mut label.width, &mut label.height);
    }
}

fn reverse_y(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, node| {
        if let Some(y) = node.y.as_mut() {
            *y = -*y;
        }
    });
    g.for_each_edge_mut(|_, edge| {
        for p in &mut edge.points {
            p.y = -p.y;
        }
        if let Some(y) = edge.y.as_mut() {
            *y = -*y;
        }
    });
}

fn swap_xy(g: &mut LayoutGraph) {
    g.for_each_node_mut(|_, node| std::mem::swap(&mut node.x, &mut node.y));
    g.for_each_edge_mut(|_, edge| {
        for p in &mut edge.points {
            std::mem::swap(&mut p.x, &mut p.y);
        }
        std::mem::swap(&mut edge.x, &mut edge.y);
    });
}
