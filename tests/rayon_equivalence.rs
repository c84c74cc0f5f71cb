#![cfg(feature = "rayon")]

use detpost::{
    format_yolo_v2, format_yolo_v2_par, Anchor, DetectionConfig, FormatParams, PostProcessor,
    TensorView,
};

fn make_output(rows: usize, cols: usize, channels: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(rows * cols * channels);
    for y in 0..rows {
        for x in 0..cols {
            for c in 0..channels {
                let value = ((x * 13) ^ (y * 7) ^ (c * 5)) % 29;
                data.push(value as f32 * 0.25 - 3.5);
            }
        }
    }
    data
}

#[test]
fn parallel_formatter_matches_sequential() {
    let anchors = vec![
        Anchor::new(1.08, 1.19),
        Anchor::new(3.42, 4.41),
        Anchor::new(6.63, 11.38),
    ];
    let num_classes = 4;
    let shape = [1usize, 13, 11, anchors.len() * (num_classes + 5)];
    let data = make_output(shape[1], shape[2], shape[3]);
    let view = TensorView::from_slice(&data, &shape).unwrap();
    let params = FormatParams {
        boxes_per_cell: anchors.len(),
        anchors,
        num_classes,
    };

    let seq = format_yolo_v2(view, &params).unwrap();
    let par = format_yolo_v2_par(view, &params).unwrap();
    assert_eq!(seq, par);
}

#[test]
fn parallel_pipeline_matches_sequential() {
    let anchors = vec![Anchor::new(1.0, 1.5), Anchor::new(2.5, 2.0)];
    let num_classes = 3;
    let shape = [1usize, 9, 9, anchors.len() * (num_classes + 5)];
    let data = make_output(shape[1], shape[2], shape[3]);
    let view = TensorView::from_slice(&data, &shape).unwrap();

    let base = DetectionConfig {
        boxes_per_cell: anchors.len(),
        anchors,
        num_classes,
        score_threshold: 0.1,
        per_class: true,
        ..DetectionConfig::default()
    };
    let seq = PostProcessor::new(DetectionConfig {
        parallel: false,
        ..base.clone()
    })
    .unwrap();
    let par = PostProcessor::new(DetectionConfig {
        parallel: true,
        ..base
    })
    .unwrap();

    assert_eq!(seq.run(view).unwrap(), par.run(view).unwrap());
}
