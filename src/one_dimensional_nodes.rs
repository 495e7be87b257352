use std::fmt::Display;
use std::str::FromStr;

use num_traits::{Float, One};
use serde::{Deserialize, Serialize};

use crate::errors::MapError;
use crate::utilities::element::Coordinate;

/// Interpolation degree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationOrder
{
    /// Nearest neighbour (order 0).
    Nearest,
    /// Linear along each axis, multilinear overall (order 1).
    #[default]
    Linear,
}

impl InterpolationOrder
{
    /// Number of nodes each axis contributes.
    #[inline]
    pub fn num_nodes(&self) -> usize
    {
        match self
        {
            InterpolationOrder::Nearest => 1,
            InterpolationOrder::Linear => 2,
        }
    }
}

impl TryFrom<u32> for InterpolationOrder
{
    type Error = MapError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value
        {
            0 => Ok(InterpolationOrder::Nearest),
            1 => Ok(InterpolationOrder::Linear),
            order => Err(MapError::UnsupportedOrder(order)),
        }
    }
}

impl Display for InterpolationOrder
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self
        {
            InterpolationOrder::Nearest => write!(f, "nearest"),
            InterpolationOrder::Linear => write!(f, "linear"),
        }
    }
}

impl FromStr for InterpolationOrder
{
    type Err = MapError;

    /// Accepts the names `nearest`/`linear` or the degrees `0`/`1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s
        {
            "nearest" => Ok(InterpolationOrder::Nearest),
            "linear" => Ok(InterpolationOrder::Linear),
            other => match other.parse::<u32>()
            {
                Ok(order) => InterpolationOrder::try_from(order),
                Err(_) => Err(MapError::InvalidParameter { parameter: "order".to_string(), message: format!("'{other}' is not an interpolation order") }),
            },
        }
    }
}

/// Weight attached to one interpolation node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeWeight<W>
{
    /// Weight one for every element (nearest neighbour).
    Unit,
    /// One weight per output element.
    PerElement(Vec<W>),
}

impl<W: Float> NodeWeight<W>
{
    #[inline]
    pub fn at(&self, element: usize) -> W
    {
        match self
        {
            NodeWeight::Unit => W::one(),
            NodeWeight::PerElement(weights) => weights[element],
        }
    }
}

/// Candidate indices along one axis together with their weights.
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolationNode<W>
{
    pub indices: Vec<i64>,
    pub weight: NodeWeight<W>,
}

/// All nodes of one axis, lower node first.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisNodes<W>
{
    pub nodes: Vec<InterpolationNode<W>>,
}

///
/// Generate the interpolation nodes of one axis from its (flattened) coordinates.
///
pub fn axis_nodes<C: Coordinate>(coordinates: &[C], order: InterpolationOrder) -> AxisNodes<C::Weight>
{
    match order
    {
        InterpolationOrder::Nearest => nearest_nodes(coordinates),
        InterpolationOrder::Linear => linear_nodes(coordinates),
    }
}

fn nearest_nodes<C: Coordinate>(coordinates: &[C]) -> AxisNodes<C::Weight>
{
    let indices = coordinates.iter().map(|c| c.round_index()).collect();
    AxisNodes { nodes: vec![InterpolationNode { indices, weight: NodeWeight::Unit }] }
}

fn linear_nodes<C: Coordinate>(coordinates: &[C]) -> AxisNodes<C::Weight>
{
    let n = coordinates.len();
    let mut lower = Vec::with_capacity(n);
    let mut upper = Vec::with_capacity(n);
    let mut lower_weights = Vec::with_capacity(n);
    let mut upper_weights = Vec::with_capacity(n);
    let one = <C::Weight as One>::one();
    for c in coordinates
    {
        let (index, fraction) = c.floor_index();
        lower.push(index);
        upper.push(index + 1);
        lower_weights.push(one - fraction);
        upper_weights.push(fraction);
    }
    AxisNodes
    {
        nodes: vec![
            InterpolationNode { indices: lower, weight: NodeWeight::PerElement(lower_weights) },
            InterpolationNode { indices: upper, weight: NodeWeight::PerElement(upper_weights) },
        ],
    }
}

#[test]
fn nearest_rounds_half_away_from_zero()
{
    let nodes = axis_nodes(&[-1.5_f64, -0.5, 0.4, 0.5, 1.5, 2.5], InterpolationOrder::Nearest);
    assert_eq!(nodes.nodes.len(), InterpolationOrder::Nearest.num_nodes());
    assert_eq!(nodes.nodes[0].indices, vec![-2, -1, 0, 1, 2, 3]);
    assert_eq!(nodes.nodes[0].weight, NodeWeight::Unit);
    assert_eq!(nodes.nodes[0].weight.at(4), 1.0);
}

#[test]
fn linear_weights_sum_to_one()
{
    let coordinates = [-3.75_f64, -1.0, -0.25, 0.0, 0.3, 1.5, 2.999, 1e9 + 0.5];
    let nodes = axis_nodes(&coordinates, InterpolationOrder::Linear);
    assert_eq!(nodes.nodes.len(), InterpolationOrder::Linear.num_nodes());
    let (lower, upper) = (&nodes.nodes[0], &nodes.nodes[1]);
    for i in 0..coordinates.len()
    {
        assert_eq!(upper.indices[i], lower.indices[i] + 1);
        assert_eq!(lower.weight.at(i) + upper.weight.at(i), 1.0);
        assert!((lower.indices[i] as f64 + upper.weight.at(i) - coordinates[i]).abs() < 1e-12);
    }
    assert_eq!(lower.indices[..3], [-4, -1, -1]);
}

#[test]
fn integer_coordinates_take_the_lower_node()
{
    let nodes = axis_nodes(&[2_i32, -3], InterpolationOrder::Linear);
    assert_eq!(nodes.nodes[0].indices, vec![2, -3]);
    assert_eq!(nodes.nodes[0].weight, NodeWeight::PerElement(vec![1.0, 1.0]));
    assert_eq!(nodes.nodes[1].weight, NodeWeight::PerElement(vec![0.0, 0.0]));
}

#[test]
fn parse_orders()
{
    assert_eq!(InterpolationOrder::try_from(0_u32), Ok(InterpolationOrder::Nearest));
    assert_eq!(InterpolationOrder::try_from(1_u32), Ok(InterpolationOrder::Linear));
    assert_eq!(InterpolationOrder::try_from(3_u32), Err(MapError::UnsupportedOrder(3)));
    assert_eq!("linear".parse::<InterpolationOrder>(), Ok(InterpolationOrder::Linear));
    assert_eq!("0".parse::<InterpolationOrder>(), Ok(InterpolationOrder::Nearest));
    assert_eq!("2".parse::<InterpolationOrder>(), Err(MapError::UnsupportedOrder(2)));
    assert!("cubic".parse::<InterpolationOrder>().is_err());
}
