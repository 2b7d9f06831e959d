use approx::assert_relative_eq;
use orrery_ngin::{
    Matrix4, Point3, Transform as _, Vector3,
    data_structures::scene_graph::{Node, SceneError, SceneGraph},
    render::DrawContext,
};

mod common;
use common::test_utils::{EPSILON, Recorder, drawable, tree};

#[test]
fn depth_three_traversal_is_pre_order() {
    let t = tree();
    let mut recorder = Recorder::default();
    t.graph.render(t.root, &DrawContext::default(), &mut recorder);
    assert_eq!(recorder.nodes(), vec![t.root, t.a, t.b, t.d, t.c]);
}

#[test]
fn world_matrix_is_the_product_of_ancestor_locals() {
    let t = tree();
    let mut recorder = Recorder::default();
    t.graph.render(t.root, &DrawContext::default(), &mut recorder);

    let expected = t.graph[t.root].get_transform()
        * t.graph[t.a].get_transform()
        * t.graph[t.b].get_transform()
        * t.graph[t.d].get_transform();
    let rendered = recorder.world_of(t.d).unwrap();
    assert_relative_eq!(rendered, expected, epsilon = EPSILON);
    assert_relative_eq!(t.graph.world_matrix(t.d).unwrap(), expected, epsilon = EPSILON);

    let origin = rendered.transform_point(Point3::new(0.0, 0.0, 0.0));
    assert_relative_eq!(origin, Point3::new(3.0, 4.0, 2.0), epsilon = EPSILON);
}

#[test]
fn subtree_render_starts_from_identity() {
    let t = tree();
    let mut recorder = Recorder::default();
    t.graph.render(t.b, &DrawContext::default(), &mut recorder);
    assert_eq!(recorder.nodes(), vec![t.b, t.d]);
    assert_relative_eq!(
        recorder.world_of(t.b).unwrap(),
        t.graph[t.b].get_transform(),
        epsilon = EPSILON
    );
}

#[test]
fn pivots_are_traversed_but_not_drawn() {
    let mut graph = SceneGraph::new();
    let pivot = graph.add_node(Node::new().with_translation(Vector3::new(0.0, 5.0, 0.0)));
    let child = graph.add_node(drawable());
    graph.add_child(pivot, child).unwrap();

    let mut recorder = Recorder::default();
    graph.render(pivot, &DrawContext::default(), &mut recorder);
    assert_eq!(recorder.nodes(), vec![child]);
    assert_relative_eq!(
        recorder.world_of(child).unwrap(),
        Matrix4::from_translation(Vector3::new(0.0, 5.0, 0.0)),
        epsilon = EPSILON
    );
}

#[test]
fn rotate_y_accumulates() {
    let mut split = drawable();
    split.rotate_y(0.3);
    split.rotate_y(0.5);
    let mut once = drawable();
    once.rotate_y(0.8);
    assert_relative_eq!(split.get_transform(), once.get_transform(), epsilon = EPSILON);
}

#[test]
fn invalid_edges_are_rejected() {
    let t = tree();
    let mut graph = t.graph;

    assert_eq!(graph.add_child(t.a, t.a), Err(SceneError::SelfEdge(t.a)));
    assert_eq!(
        graph.add_child(t.d, t.root),
        Err(SceneError::Cycle {
            parent: t.d,
            child: t.root
        })
    );
    assert_eq!(
        graph.add_child(t.c, t.d),
        Err(SceneError::AlreadyParented {
            child: t.d,
            parent: t.b
        })
    );

    let mut bigger = SceneGraph::new();
    let foreign = (0..10).map(|_| bigger.add_node(Node::new())).last().unwrap();
    assert_eq!(
        graph.add_child(t.root, foreign),
        Err(SceneError::UnknownNode(foreign))
    );
    // the failed calls left the tree untouched
    assert_eq!(graph[t.a].children(), &[t.b, t.c]);
}
