//! End-to-end operating-point synthesis scenarios.

use converter::boost::{BoostOperatingPointSpec, BoostRequest};
use converter::buck::{BuckOperatingPointSpec, BuckRequest, InductanceLimit};
use converter::flyback::{FlybackOperatingPointSpec, FlybackRequest};
use converter::isolated_buck_boost::{IsolatedBuckBoostOperatingPointSpec, IsolatedBuckBoostRequest};
use converter::Converter;
use om_core::dim::DimWithTol;
use waveform::{AnalyticalParams, WaveformLabel};

fn label_of(excitation: &waveform::OperatingPointExcitation, voltage: bool) -> Option<WaveformLabel> {
    let descriptor = if voltage { excitation.voltage.as_ref() } else { excitation.current.as_ref() };
    descriptor.and_then(|d| d.waveform.as_ref()).and_then(|w| w.label())
}

#[test]
fn scenario_a_buck_nominal() {
    let request = BuckRequest {
        input_voltage: DimWithTol::from_range(20.0, 240.0).unwrap(),
        diode_voltage_drop: 0.7,
        efficiency: 0.9,
        inductance_limit: InductanceLimit::MaximumSwitchCurrent(8.0),
        operating_points: vec![BuckOperatingPointSpec {
            output_voltage: 12.0,
            output_current: 3.0,
            frequency: 100_000.0,
            ambient_temperature: 42.0,
        }],
    };

    let requirements = request.process_design_requirements().unwrap();
    let points = request
        .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
        .unwrap();
    assert_eq!(points.len(), 2);

    let minimum = &points[0].excitations_per_winding[0];
    assert_eq!(label_of(minimum, true), Some(WaveformLabel::Rectangular));
    assert_eq!(label_of(minimum, false), Some(WaveformLabel::Triangular));
    if let AnalyticalParams::Triangular { offset, .. } = minimum.current.as_ref().unwrap().waveform.as_ref().unwrap() {
        assert!(*offset > 0.0);
    } else {
        unreachable!();
    }

    let maximum = &points[1].excitations_per_winding[0];
    assert_eq!(label_of(maximum, true), Some(WaveformLabel::RectangularWithDeadtime));
    assert_eq!(label_of(maximum, false), Some(WaveformLabel::TriangularWithDeadtime));
    if let AnalyticalParams::TriangularWithDeadtime { offset, ipp, .. } =
        maximum.current.as_ref().unwrap().waveform.as_ref().unwrap()
    {
        assert_eq!(*offset, *ipp / 2.0);
    } else {
        unreachable!();
    }
}

#[test]
fn scenario_b_boost_nominal() {
    let request = BoostRequest {
        input_voltage: DimWithTol::from_range(12.0, 24.0).unwrap(),
        diode_voltage_drop: 0.7,
        efficiency: 1.0,
        inductance_limit: InductanceLimit::MaximumSwitchCurrent(8.0),
        operating_points: vec![BoostOperatingPointSpec {
            output_voltage: 50.0,
            output_current: 1.0,
            frequency: 100_000.0,
            ambient_temperature: 25.0,
        }],
    };

    let requirements = request.process_design_requirements().unwrap();
    let points = request
        .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
        .unwrap();

    let minimum = &points[0].excitations_per_winding[0];
    assert_eq!(label_of(minimum, true), Some(WaveformLabel::Rectangular));
    assert_eq!(label_of(minimum, false), Some(WaveformLabel::Triangular));
    if let AnalyticalParams::Rectangular { vpp, .. } = minimum.voltage.as_ref().unwrap().waveform.as_ref().unwrap() {
        assert!((vpp - 50.0).abs() / 50.0 < 0.1);
    } else {
        unreachable!();
    }
    if let AnalyticalParams::Triangular { offset, .. } = minimum.current.as_ref().unwrap().waveform.as_ref().unwrap() {
        assert!(*offset > 0.0);
    } else {
        unreachable!();
    }

    let maximum = points.last().unwrap().excitations_per_winding.first().unwrap();
    assert_eq!(label_of(maximum, true), Some(WaveformLabel::RectangularWithDeadtime));
    assert_eq!(label_of(maximum, false), Some(WaveformLabel::TriangularWithDeadtime));
    if let AnalyticalParams::TriangularWithDeadtime { offset, ipp, .. } =
        maximum.current.as_ref().unwrap().waveform.as_ref().unwrap()
    {
        assert_eq!(*offset, *ipp / 2.0);
    } else {
        unreachable!();
    }
}

fn flyback_scenario(ripple_ratio: f64) -> FlybackRequest {
    FlybackRequest {
        input_voltage: DimWithTol::from_range(110.0, 240.0).unwrap(),
        diode_voltage_drop: 0.7,
        efficiency: 1.0,
        max_duty_cycle: None,
        max_drain_source_voltage: Some(350.0),
        drain_source_capacitance: 100e-12,
        operating_points: vec![FlybackOperatingPointSpec {
            output_voltages: vec![12.0, 12.0],
            output_currents: vec![3.0, 5.0],
            frequency: Some(100_000.0),
            mode: None,
            ripple_ratio,
            ambient_temperature: 42.0,
        }],
    }
}

#[test]
fn scenario_c_flyback_ccm() {
    let request = flyback_scenario(0.3);
    let requirements = request.process_design_requirements().unwrap();
    let points = request
        .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
        .unwrap();

    let primary = &points[0].excitations_per_winding[0];
    assert_eq!(label_of(primary, false), Some(WaveformLabel::FlybackPrimary));
    if let AnalyticalParams::FlybackPrimary { offset, .. } = primary.current.as_ref().unwrap().waveform.as_ref().unwrap() {
        assert!(*offset > 0.0);
    } else {
        unreachable!();
    }
    if let AnalyticalParams::Rectangular { vpp, .. } = primary.voltage.as_ref().unwrap().waveform.as_ref().unwrap() {
        assert!(*vpp > 0.0);
    } else {
        unreachable!();
    }

    for (secondary, expected_current) in
        points[0].excitations_per_winding[1..].iter().zip([3.0, 5.0])
    {
        assert_eq!(label_of(secondary, true), Some(WaveformLabel::SecondaryRectangular));
        if let AnalyticalParams::FlybackSecondary { offset, ipp, .. } =
            secondary.current.as_ref().unwrap().waveform.as_ref().unwrap()
        {
            let average = offset + ipp / 2.0 * 0.5;
            assert!((average - expected_current).abs() / expected_current < 2.0);
        } else {
            unreachable!();
        }
    }
}

#[test]
fn scenario_d_flyback_dcm() {
    let request = flyback_scenario(1.0);
    let requirements = request.process_design_requirements().unwrap();
    let points = request
        .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
        .unwrap();

    let primary = &points[0].excitations_per_winding[0];
    assert_eq!(label_of(primary, true), Some(WaveformLabel::Rectangular));
    assert_eq!(label_of(primary, false), Some(WaveformLabel::FlybackPrimaryWithDeadtime));
    if let AnalyticalParams::FlybackPrimaryWithDeadtime { offset, .. } =
        primary.current.as_ref().unwrap().waveform.as_ref().unwrap()
    {
        assert!(offset.abs() < 1e-6);
    } else {
        unreachable!();
    }

    for secondary in &points[0].excitations_per_winding[1..] {
        assert_eq!(label_of(secondary, true), Some(WaveformLabel::SecondaryRectangularWithDeadtime));
        assert_eq!(label_of(secondary, false), Some(WaveformLabel::FlybackSecondaryWithDeadtime));
    }
}

#[test]
fn scenario_e_isolated_buck_boost() {
    let request = IsolatedBuckBoostRequest {
        input_voltage: DimWithTol::from_range(10.0, 30.0).unwrap(),
        diode_voltage_drop: 0.0,
        efficiency: 1.0,
        inductance_limit: InductanceLimit::MaximumSwitchCurrent(2.5),
        operating_points: vec![IsolatedBuckBoostOperatingPointSpec {
            output_voltages: vec![6.0, 5.0, 5.0],
            output_currents: vec![0.01, 1.0, 0.3],
            frequency: 400_000.0,
            ambient_temperature: 25.0,
        }],
    };

    let requirements = request.process_design_requirements().unwrap();
    let points = request
        .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
        .unwrap();
    let excitations = &points[0].excitations_per_winding;
    assert_eq!(excitations.len(), 3);

    let primary = &excitations[0];
    assert_eq!(label_of(primary, true), Some(WaveformLabel::Rectangular));
    assert_eq!(label_of(primary, false), Some(WaveformLabel::Triangular));
    if let AnalyticalParams::Triangular { offset, .. } = primary.current.as_ref().unwrap().waveform.as_ref().unwrap() {
        assert!(*offset > 0.0);
    } else {
        unreachable!();
    }

    for secondary in &excitations[1..] {
        assert_eq!(label_of(secondary, true), Some(WaveformLabel::SecondaryRectangular));
        assert_eq!(label_of(secondary, false), Some(WaveformLabel::FlybackPrimary));
        if let AnalyticalParams::FlybackPrimary { offset, .. } =
            secondary.current.as_ref().unwrap().waveform.as_ref().unwrap()
        {
            assert!(offset.abs() < 0.01);
        } else {
            unreachable!();
        }
    }
}
