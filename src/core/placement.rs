use winsys::geometry::WindowChanges;

// Some clients (Firefox's "About" dialog among them) ask to be resized to a
// single pixel; such dimensions are never forwarded.
const DEGENERATE_DIM: u32 = 1;

/// Splits a client's configure request into the configure calls that honor
/// it, in the order they must be issued.
///
/// The first call carries the geometry fields (x, y, width, height) that are
/// set to a non-default value. It is omitted if none survive. A requested
/// sibling and a requested stack mode each follow in a call of their own.
pub fn placement_changes(request: &WindowChanges) -> Vec<WindowChanges> {
    let mut changes = Vec::with_capacity(3);

    let geometry = WindowChanges {
        x: request.x.filter(|&x| x != 0),
        y: request.y.filter(|&y| y != 0),
        width: request.width.filter(|&w| w > DEGENERATE_DIM),
        height: request.height.filter(|&h| h > DEGENERATE_DIM),
        ..Default::default()
    };

    if !geometry.is_empty() {
        changes.push(geometry);
    }

    if let Some(sibling) = request.sibling {
        changes.push(WindowChanges::from_sibling(sibling));
    }

    if let Some(stack_mode) = request.stack_mode {
        changes.push(WindowChanges::from_stack_mode(stack_mode));
    }

    changes
}
