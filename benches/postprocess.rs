use criterion::{criterion_group, criterion_main, Criterion};
use detpost::{
    exclude_low_score_box, format_yolo_v2, nms, DetectionConfig, NmsParams, PostProcessor,
    TensorView,
};
use std::hint::black_box;

fn make_output(rows: usize, cols: usize, channels: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(rows * cols * channels);
    for y in 0..rows {
        for x in 0..cols {
            for c in 0..channels {
                let value = ((x * 13) ^ (y * 7) ^ (c * 3) ^ (x * y)) % 41;
                data.push(value as f32 * 0.2 - 4.0);
            }
        }
    }
    data
}

fn bench_postprocess(c: &mut Criterion) {
    let config = DetectionConfig {
        num_classes: 20,
        per_class: true,
        ..DetectionConfig::default()
    };
    let channels = config.anchors.len() * (config.num_classes + 5);
    let shape = [1usize, 13, 13, channels];
    let data = make_output(shape[1], shape[2], shape[3]);
    let view = TensorView::from_slice(&data, &shape).unwrap();

    let params = config.format_params();
    c.bench_function("format_yolo_v2_13x13", |b| {
        b.iter(|| black_box(format_yolo_v2(view, &params).unwrap()));
    });

    let decoded = format_yolo_v2(view, &params).unwrap();
    let filtered = exclude_low_score_box(&decoded, config.score_threshold);
    let nms_params = NmsParams {
        max_output_size: None,
        ..config.nms_params()
    };
    c.bench_function("nms_13x13", |b| {
        b.iter(|| black_box(nms(&filtered, &nms_params)));
    });

    let processor = PostProcessor::new(config.clone()).unwrap();
    c.bench_function("postprocess_13x13", |b| {
        b.iter(|| black_box(processor.run(view).unwrap()));
    });

    #[cfg(feature = "rayon")]
    {
        let processor_par = PostProcessor::new(DetectionConfig {
            parallel: true,
            ..config
        })
        .unwrap();
        c.bench_function("postprocess_13x13_parallel", |b| {
            b.iter(|| black_box(processor_par.run(view).unwrap()));
        });
    }
}

criterion_group!(benches, bench_postprocess);
criterion_main!(benches);
