//! Tabulated weights and points.
//!
//! Segment rules are stored as `(weights, points)` on `[-1, 1]`, ordered by increasing abscissa.

const SEGMENT_2: ([f64; 2], [f64; 2]) = ([1.0, 1.0], [-0.577_350_269_189_625_8, 0.577_350_269_189_625_8]);

const SEGMENT_3: ([f64; 3], [f64; 3]) = (
    [0.555_555_555_555_555_6, 0.888_888_888_888_888_9, 0.555_555_555_555_555_6],
    [-0.774_596_669_241_483_4, 0.0, 0.774_596_669_241_483_4],
);

const SEGMENT_4: ([f64; 4], [f64; 4]) = (
    [
        0.347_854_845_137_453_9,
        0.652_145_154_862_546_1,
        0.652_145_154_862_546_1,
        0.347_854_845_137_453_9,
    ],
    [
        -0.861_136_311_594_052_6,
        -0.339_981_043_584_856_3,
        0.339_981_043_584_856_3,
        0.861_136_311_594_052_6,
    ],
);

const SEGMENT_5: ([f64; 5], [f64; 5]) = (
    [
        0.236_926_885_056_189_1,
        0.478_628_670_499_366_5,
        0.568_888_888_888_888_9,
        0.478_628_670_499_366_5,
        0.236_926_885_056_189_1,
    ],
    [
        -0.906_179_845_938_664,
        -0.538_469_310_105_683_1,
        0.0,
        0.538_469_310_105_683_1,
        0.906_179_845_938_664,
    ],
);

const SEGMENT_6: ([f64; 6], [f64; 6]) = (
    [
        0.171_324_492_379_170_3,
        0.360_761_573_048_138_6,
        0.467_913_934_572_691,
        0.467_913_934_572_691,
        0.360_761_573_048_138_6,
        0.171_324_492_379_170_3,
    ],
    [
        -0.932_469_514_203_152,
        -0.661_209_386_466_264_5,
        -0.238_619_186_083_196_9,
        0.238_619_186_083_196_9,
        0.661_209_386_466_264_5,
        0.932_469_514_203_152,
    ],
);

const SEGMENT_7: ([f64; 7], [f64; 7]) = (
    [
        0.129_484_966_168_869_7,
        0.279_705_391_489_276_7,
        0.381_830_050_505_118_9,
        0.417_959_183_673_469_4,
        0.381_830_050_505_118_9,
        0.279_705_391_489_276_7,
        0.129_484_966_168_869_7,
    ],
    [
        -0.949_107_912_342_758_5,
        -0.741_531_185_599_394_4,
        -0.405_845_151_377_397_2,
        0.0,
        0.405_845_151_377_397_2,
        0.741_531_185_599_394_4,
        0.949_107_912_342_758_5,
    ],
);

// Symmetric 7-point rule of degree 5 (Strang & Fix), on the triangle (0, 0), (1, 0), (0, 1).
const TRIANGLE_7_WEIGHTS: [f64; 7] = [
    0.062_969_590_272_413_58,
    0.062_969_590_272_413_58,
    0.062_969_590_272_413_58,
    0.066_197_076_394_253_09,
    0.066_197_076_394_253_09,
    0.066_197_076_394_253_09,
    0.112_5,
];

const TRIANGLE_7_POINTS: [[f64; 2]; 7] = [
    [0.101_286_507_323_456_3, 0.101_286_507_323_456_3],
    [0.797_426_985_353_087_3, 0.101_286_507_323_456_3],
    [0.101_286_507_323_456_3, 0.797_426_985_353_087_3],
    [0.470_142_064_105_115_1, 0.470_142_064_105_115_1],
    [0.059_715_871_789_769_8, 0.470_142_064_105_115_1],
    [0.470_142_064_105_115_1, 0.059_715_871_789_769_8],
    [1.0 / 3.0, 1.0 / 3.0],
];

pub(crate) fn segment(num_points: usize) -> Option<(&'static [f64], &'static [f64])> {
    match num_points {
        2 => Some((&SEGMENT_2.0, &SEGMENT_2.1)),
        3 => Some((&SEGMENT_3.0, &SEGMENT_3.1)),
        4 => Some((&SEGMENT_4.0, &SEGMENT_4.1)),
        5 => Some((&SEGMENT_5.0, &SEGMENT_5.1)),
        6 => Some((&SEGMENT_6.0, &SEGMENT_6.1)),
        7 => Some((&SEGMENT_7.0, &SEGMENT_7.1)),
        _ => None,
    }
}

pub(crate) fn triangle(num_points: usize) -> Option<(&'static [f64], &'static [[f64; 2]])> {
    match num_points {
        7 => Some((&TRIANGLE_7_WEIGHTS, &TRIANGLE_7_POINTS)),
        _ => None,
    }
}
