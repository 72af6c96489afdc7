//! GPU Identification Stage
//!
//! Reports the vendor and device of the first render node the platform
//! exposes. Identification only; no rendering happens here.

use crate::context::ProbeContext;
use crate::runner::StageOutcome;
use sysprobe_core::ProbeError;

/// Vendor and device identifiers of a graphics adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuIdentity {
    /// PCI vendor identifier, e.g. `0x8086`.
    pub vendor: String,
    /// PCI device identifier.
    pub device: String,
}

impl GpuIdentity {
    fn describe(&self) -> String {
        format!("vendor {}, device {}", self.vendor, self.device)
    }
}

#[cfg(target_os = "linux")]
fn read_gpu() -> Result<GpuIdentity, ProbeError> {
    let entries = std::fs::read_dir("/sys/class/drm")
        .map_err(|e| ProbeError::stage(format!("failed to read drm devices: {e}")))?;

    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        // card0, card1, ... ; connectors look like card0-HDMI-A-1.
        if !name.starts_with("card") || name.contains('-') {
            continue;
        }
        let device = entry.path().join("device");
        let vendor = std::fs::read_to_string(device.join("vendor"))
            .map_err(|e| ProbeError::stage(format!("failed to read gpu vendor: {e}")))?;
        let device_id = std::fs::read_to_string(device.join("device"))
            .map_err(|e| ProbeError::stage(format!("failed to read gpu device: {e}")))?;

        return Ok(GpuIdentity {
            vendor: vendor.trim().to_string(),
            device: device_id.trim().to_string(),
        });
    }

    Err(ProbeError::Unsupported("GPU Identification".to_string()))
}

#[cfg(not(target_os = "linux"))]
fn read_gpu() -> Result<GpuIdentity, ProbeError> {
    Err(ProbeError::Unsupported("GPU Identification".to_string()))
}

/// GPU identification stage: report the adapter's vendor and device.
pub fn stage_gpu_identification(_cx: &mut ProbeContext) -> Result<StageOutcome, ProbeError> {
    let identity = read_gpu()?;
    Ok(StageOutcome::new(identity.describe()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_describes_vendor_and_device() {
        let identity = GpuIdentity {
            vendor: "0x8086".to_string(),
            device: "0x46a6".to_string(),
        };
        assert_eq!(identity.describe(), "vendor 0x8086, device 0x46a6");
    }
}
